//! Tests for error types

#[cfg(test)]
mod tests {
    use crate::error::AdbxError;
    use std::path::PathBuf;

    #[test]
    fn test_device_error_display() {
        let err = AdbxError::NoDeviceFound;
        assert!(format!("{}", err).contains("No devices"));

        let err = AdbxError::DeviceNotFound("xyz789".to_string());
        assert!(format!("{}", err).contains("xyz789"));

        let err = AdbxError::MultipleDevicesFound;
        assert!(format!("{}", err).contains("Multiple"));

        let err = AdbxError::DeviceIdRequired;
        assert!(format!("{}", err).contains("required"));
    }

    #[test]
    fn test_failure_details_are_surfaced() {
        let err = AdbxError::RemoteListError {
            path: "/sdcard/private".to_string(),
            exit_code: 1,
            diagnostic: "Permission denied".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("/sdcard/private"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("Permission denied"));

        let err = AdbxError::TransferFailed {
            exit_code: 2,
            diagnostic: "remote couldn't create file".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("exit code 2"));
        assert!(msg.contains("couldn't create file"));
    }

    #[test]
    fn test_only_tool_not_found_is_fatal() {
        assert!(AdbxError::ToolNotFound(PathBuf::from("/opt/adb")).is_fatal());
        assert!(!AdbxError::NoDeviceFound.is_fatal());
        assert!(!AdbxError::Cancelled.is_fatal());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AdbxError = io_err.into();
        assert!(format!("{}", err).contains("I/O error"));
    }

    #[test]
    fn test_error_from_string() {
        let err: AdbxError = "something went wrong".to_string().into();
        assert!(format!("{}", err).contains("something went wrong"));
    }
}

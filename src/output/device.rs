use crate::core::types::Device;
use crate::output::{PlainFormat, TableFormat};

impl TableFormat for Device {
    fn headers() -> Vec<&'static str> {
        vec!["DEVICE ID", "STATE"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.state.to_string()]
    }
}

impl PlainFormat for Device {
    fn plain(&self) -> String {
        self.id.to_string()
    }
}

//! Tests for the one-shot filesystem commands

#[cfg(test)]
mod tests {
    use crate::commands::{
        cp::{CpArgs, CpCommand},
        devices::{DevicesArgs, DevicesCommand},
        ls::{LsArgs, LsCommand},
        mkdir::{MkdirArgs, MkdirCommand},
        mv::{MvArgs, MvCommand},
        rm::{RmArgs, RmCommand},
        stat::{StatArgs, StatCommand},
        tree::{TreeArgs, TreeCommand},
        SubCommand,
    };
    use crate::error::AdbxError;
    use crate::testing::fixtures::{self, test_context};
    use crate::testing::{Scripted, ScriptedRunner};
    use std::sync::Arc;

    fn runner() -> ScriptedRunner {
        ScriptedRunner::new().on("devices", Scripted::ok(fixtures::DEVICES_SINGLE))
    }

    fn shell_calls(runner: &ScriptedRunner) -> Vec<String> {
        runner
            .command_lines()
            .into_iter()
            .filter(|c| c.contains(" shell "))
            .collect()
    }

    #[tokio::test]
    async fn test_devices_no_devices() {
        let runner = Arc::new(ScriptedRunner::new().on("devices", Scripted::ok(fixtures::DEVICES_NONE)));
        let ctx = test_context(runner);

        let result = DevicesCommand::new().run(&ctx, DevicesArgs::default()).await;
        assert!(matches!(result, Err(AdbxError::NoDeviceFound)));
    }

    #[tokio::test]
    async fn test_devices_lists_available() {
        let runner = Arc::new(ScriptedRunner::new().on("devices", Scripted::ok(fixtures::DEVICES_MIXED)));
        let ctx = test_context(runner.clone());

        DevicesCommand::new().run(&ctx, DevicesArgs::default()).await.unwrap();
        assert_eq!(runner.command_lines(), vec!["devices"]);
    }

    #[tokio::test]
    async fn test_session_requires_known_device() {
        let runner = Arc::new(ScriptedRunner::new().on("devices", Scripted::ok(fixtures::DEVICES_MIXED)));
        let ctx = test_context(runner);

        let result = LsCommand::new().run(&ctx, LsArgs::default()).await;
        assert!(matches!(result, Err(AdbxError::DeviceNotFound(_))));
    }

    #[tokio::test]
    async fn test_ls_resolves_against_root() {
        let runner = Arc::new(runner().on("ls -p", Scripted::ok("Camera/\n")));
        let ctx = test_context(runner.clone());

        let args = LsArgs {
            path: Some("DCIM".to_string()),
        };
        LsCommand::new().run(&ctx, args).await.unwrap();
        assert_eq!(shell_calls(&runner), vec!["-s ABC123 shell ls -p /sdcard/DCIM/"]);
    }

    #[tokio::test]
    async fn test_ls_failure() {
        let runner = Arc::new(runner().on("ls -p", Scripted::fail(1, "Permission denied")));
        let ctx = test_context(runner);

        let result = LsCommand::new().run(&ctx, LsArgs::default()).await;
        assert!(matches!(result, Err(AdbxError::RemoteListError { .. })));
    }

    #[tokio::test]
    async fn test_mutation_commands() {
        let runner = Arc::new(runner());
        let ctx = test_context(runner.clone());

        MkdirCommand::new()
            .run(&ctx, MkdirArgs { paths: vec!["New Folder".to_string()] })
            .await
            .unwrap();
        CpCommand::new()
            .run(&ctx, CpArgs { src: "a.txt".to_string(), dst: "/data/local/tmp/a.txt".to_string() })
            .await
            .unwrap();
        MvCommand::new()
            .run(&ctx, MvArgs { src: "a.txt".to_string(), dst: "b.txt".to_string() })
            .await
            .unwrap();
        RmCommand::new()
            .run(&ctx, RmArgs { paths: vec!["b.txt".to_string(), "Old".to_string()] })
            .await
            .unwrap();

        assert_eq!(
            shell_calls(&runner),
            vec![
                "-s ABC123 shell mkdir -p '/sdcard/New Folder'",
                "-s ABC123 shell cp -r /sdcard/a.txt /data/local/tmp/a.txt",
                "-s ABC123 shell mv /sdcard/a.txt /sdcard/b.txt",
                "-s ABC123 shell rm -rf /sdcard/b.txt",
                "-s ABC123 shell rm -rf /sdcard/Old",
            ]
        );
    }

    #[tokio::test]
    async fn test_rm_refuses_root() {
        let runner = Arc::new(runner());
        let ctx = test_context(runner.clone());

        let result = RmCommand::new()
            .run(&ctx, RmArgs { paths: vec!["..".to_string()] })
            .await;
        assert!(matches!(result, Err(AdbxError::InvalidPath(_))));
        assert!(shell_calls(&runner).is_empty());
    }

    #[tokio::test]
    async fn test_stat_failure() {
        let runner = Arc::new(runner().on("stat -c %s", Scripted::ok("not a number\n")));
        let ctx = test_context(runner);

        let result = StatCommand::new()
            .run(&ctx, StatArgs { paths: vec!["photo.jpg".to_string()] })
            .await;
        assert!(matches!(result, Err(AdbxError::StatError { .. })));
    }

    #[tokio::test]
    async fn test_tree_depth() {
        let runner = Arc::new(
            runner()
                .on("ls -p /sdcard/DCIM/", Scripted::ok("Camera/\n"))
                .on("ls -p /sdcard/", Scripted::ok("DCIM/\nx.txt\n")),
        );
        let ctx = test_context(runner.clone());

        TreeCommand::new()
            .run(&ctx, TreeArgs { path: None, depth: 1 })
            .await
            .unwrap();
        assert_eq!(shell_calls(&runner), vec!["-s ABC123 shell ls -p /sdcard/"]);
    }
}

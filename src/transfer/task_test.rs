//! Tests for the transfer state machine

#[cfg(test)]
mod tests {
    use crate::core::path::RemotePath;
    use crate::error::AdbxError;
    use crate::testing::fixtures::test_session;
    use crate::testing::{Scripted, ScriptedRunner};
    use crate::transfer::{
        TransferEvent, TransferHandle, TransferJob, TransferOutcome, TransferState,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Everything a handle reported, in order
    struct Observed {
        states: Vec<TransferState>,
        sizes: Vec<u64>,
        percents: Vec<u8>,
        outcomes: Vec<TransferOutcome>,
        final_state: TransferState,
    }

    async fn drain(mut handle: TransferHandle) -> Observed {
        let mut states = Vec::new();
        let mut sizes = Vec::new();
        let mut percents = Vec::new();
        let mut outcomes = Vec::new();
        while let Some(event) = handle.next_event().await {
            match event {
                TransferEvent::State(s) => states.push(s),
                TransferEvent::Sized(total) => sizes.push(total),
                TransferEvent::Progress(p) => percents.push(p.percent),
                TransferEvent::Finished(o) => outcomes.push(o),
            }
        }
        let final_state = handle.wait().await.unwrap();
        Observed {
            states,
            sizes,
            percents,
            outcomes,
            final_state,
        }
    }

    fn local_file(dir: &TempDir, name: &str, size: usize) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, vec![0u8; size]).unwrap();
        path
    }

    fn remote(s: &str) -> RemotePath {
        RemotePath::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_push_completes_with_full_progress() {
        let dir = TempDir::new().unwrap();
        let src = local_file(&dir, "f.bin", 1_000_000);
        let runner = Arc::new(ScriptedRunner::new().on(
            " push -p ",
            Scripted::lines(&["[ 50%] /sdcard/f.bin", "[100%] /sdcard/f.bin"], 0),
        ));
        let session = test_session(runner.clone());

        let handle = session
            .start_transfer(TransferJob::push(&src, remote("/sdcard/f.bin")))
            .unwrap();
        let observed = drain(handle).await;

        assert_eq!(
            observed.states,
            vec![
                TransferState::Pending,
                TransferState::SizingSource,
                TransferState::Transferring,
                TransferState::Completed
            ]
        );
        assert_eq!(observed.sizes, vec![1_000_000]);
        assert_eq!(observed.percents, vec![50, 100]);
        assert_eq!(observed.final_state, TransferState::Completed);
        assert_eq!(observed.outcomes.len(), 1);
        match &observed.outcomes[0] {
            TransferOutcome::Completed { total_bytes, .. } => assert_eq!(*total_bytes, 1_000_000),
            other => panic!("unexpected outcome: {:?}", other),
        }

        // Written under a temporary name, then moved into place
        let calls = runner.command_lines();
        assert_eq!(
            calls[0],
            format!("-s ABC123 push -p {} /sdcard/f.bin.adbx-part", src.display())
        );
        assert_eq!(calls[1], "-s ABC123 shell mv /sdcard/f.bin.adbx-part /sdcard/f.bin");
    }

    #[tokio::test]
    async fn test_progress_is_non_decreasing() {
        let dir = TempDir::new().unwrap();
        let src = local_file(&dir, "f.bin", 4096);
        let runner = Arc::new(ScriptedRunner::new().on(
            " push -p ",
            Scripted::lines(
                &["[ 10%] f", "[ 40%] f", "[ 30%] f", "garbage", "[ 40%] f", "[ 90%] f"],
                0,
            ),
        ));
        let session = test_session(runner);

        let observed = drain(
            session
                .start_transfer(TransferJob::push(&src, remote("/sdcard/f.bin")))
                .unwrap(),
        )
        .await;

        assert_eq!(observed.percents, vec![10, 40, 90, 100]);
        assert!(observed.percents.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_pull_stat_failure_never_starts_transfer() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(
            ScriptedRunner::new().on("stat", Scripted::fail(1, "No such file or directory")),
        );
        let session = test_session(runner.clone());

        let observed = drain(
            session
                .start_transfer(TransferJob::pull(remote("/sdcard/gone.bin"), dir.path().join("gone.bin")))
                .unwrap(),
        )
        .await;

        assert_eq!(observed.final_state, TransferState::Failed);
        assert_eq!(
            observed.states,
            vec![TransferState::Pending, TransferState::SizingSource, TransferState::Failed]
        );
        assert!(observed.sizes.is_empty());
        assert!(matches!(
            observed.outcomes.as_slice(),
            [TransferOutcome::Failed(AdbxError::SizeUnavailable { .. })]
        ));
        assert!(!runner.was_called_with(" pull "));
    }

    #[tokio::test]
    async fn test_push_missing_local_file_is_size_unavailable() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(ScriptedRunner::new());
        let session = test_session(runner.clone());

        let observed = drain(
            session
                .start_transfer(TransferJob::push(dir.path().join("nope"), remote("/sdcard/nope")))
                .unwrap(),
        )
        .await;

        assert!(matches!(
            observed.outcomes.as_slice(),
            [TransferOutcome::Failed(AdbxError::SizeUnavailable { .. })]
        ));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pull_renames_into_place() {
        let dir = TempDir::new().unwrap();
        let dst = dir.path().join("photo.jpg");
        let runner = Arc::new(
            ScriptedRunner::new()
                .on("stat -c %s", Scripted::ok("2048\n"))
                .on(" pull -p ", Scripted::lines(&["[100%] /sdcard/photo.jpg"], 0).touching_destination()),
        );
        let session = test_session(runner);

        let observed = drain(
            session
                .start_transfer(TransferJob::pull(remote("/sdcard/photo.jpg"), &dst))
                .unwrap(),
        )
        .await;

        assert_eq!(observed.final_state, TransferState::Completed);
        assert_eq!(observed.percents, vec![100]);
        assert!(dst.exists());
        assert!(!dir.path().join("photo.jpg.adbx-part").exists());
    }

    #[tokio::test]
    async fn test_nonzero_exit_fails_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let src = local_file(&dir, "f.bin", 10);
        let runner = Arc::new(ScriptedRunner::new().on(
            " push -p ",
            Scripted::lines(
                &["[ 20%] f", "adb: error: failed to copy 'f.bin' to '/sdcard/f.bin': No space left on device"],
                1,
            ),
        ));
        let session = test_session(runner.clone());

        let observed = drain(
            session
                .start_transfer(TransferJob::push(&src, remote("/sdcard/f.bin")))
                .unwrap(),
        )
        .await;

        assert_eq!(observed.final_state, TransferState::Failed);
        assert_eq!(observed.percents, vec![20]);
        match observed.outcomes.as_slice() {
            [TransferOutcome::Failed(AdbxError::TransferFailed { exit_code, diagnostic })] => {
                assert_eq!(*exit_code, 1);
                assert!(diagnostic.contains("No space left"));
                assert!(!diagnostic.contains("20%"));
            }
            other => panic!("unexpected outcomes: {:?}", other),
        }
        assert!(runner.was_called_with("shell rm -f /sdcard/f.bin.adbx-part"));
        assert!(!runner.was_called_with("shell mv"));
    }

    #[tokio::test]
    async fn test_cancel_kills_transfer() {
        let dir = TempDir::new().unwrap();
        let runner = Arc::new(
            ScriptedRunner::new()
                .on("stat -c %s", Scripted::ok("100\n"))
                .on(" pull -p ", Scripted::lines(&["[ 5%] /sdcard/big.bin"], 0).hanging()),
        );
        let session = test_session(runner);

        let mut handle = session
            .start_transfer(TransferJob::pull(remote("/sdcard/big.bin"), dir.path().join("big.bin")))
            .unwrap();
        assert!(session.is_transferring());

        // Cancel once the transfer is visibly under way
        let mut outcome = None;
        while let Some(event) = handle.next_event().await {
            match event {
                TransferEvent::Progress(_) => handle.cancel(),
                TransferEvent::Finished(o) => outcome = Some(o),
                TransferEvent::State(_) | TransferEvent::Sized(_) => {}
            }
        }

        assert!(matches!(outcome, Some(TransferOutcome::Failed(AdbxError::Cancelled))));
        assert_eq!(handle.wait().await.unwrap(), TransferState::Failed);
        assert!(!session.is_transferring());
        assert!(!dir.path().join("big.bin").exists());
    }

    #[tokio::test]
    async fn test_timeout_kills_transfer() {
        let dir = TempDir::new().unwrap();
        let src = local_file(&dir, "f.bin", 10);
        let runner = Arc::new(ScriptedRunner::new().on(" push -p ", Scripted::lines(&[], 0).hanging()));
        let session = test_session(runner).with_transfer_timeout(Some(Duration::from_millis(50)));

        let observed = drain(
            session
                .start_transfer(TransferJob::push(&src, remote("/sdcard/f.bin")))
                .unwrap(),
        )
        .await;

        assert!(matches!(
            observed.outcomes.as_slice(),
            [TransferOutcome::Failed(AdbxError::Timeout { .. })]
        ));
    }

    #[tokio::test]
    async fn test_only_one_transfer_at_a_time() {
        let dir = TempDir::new().unwrap();
        let src = local_file(&dir, "f.bin", 10);
        let runner = Arc::new(ScriptedRunner::new().on(" push -p ", Scripted::lines(&[], 0).hanging()));
        let session = test_session(runner);

        let first = session
            .start_transfer(TransferJob::push(&src, remote("/sdcard/f.bin")))
            .unwrap();
        let second = session.start_transfer(TransferJob::push(&src, remote("/sdcard/g.bin")));
        assert!(matches!(second, Err(AdbxError::TransferInProgress)));

        first.cancel();
        let observed = drain(first).await;
        assert_eq!(observed.final_state, TransferState::Failed);
        assert!(session
            .start_transfer(TransferJob::push(&src, remote("/sdcard/g.bin")))
            .is_ok());
    }
}

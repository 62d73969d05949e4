//! Tests for sequential batches

#[cfg(test)]
mod tests {
    use crate::core::path::RemotePath;
    use crate::testing::fixtures::test_session;
    use crate::testing::{Scripted, ScriptedRunner};
    use crate::transfer::scraper::{approx_bytes, PercentParser, ProgressParser};
    use crate::transfer::{TransferEvent, TransferJob, TransferOutcome};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn remote(s: &str) -> RemotePath {
        RemotePath::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_jobs_run_in_order_and_failures_do_not_stop_batch() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, b"aaaa").unwrap();
        std::fs::write(&b, b"bbbb").unwrap();

        let runner = Arc::new(
            ScriptedRunner::new()
                .on("push -p", Scripted::lines(&["[100%] x"], 0)),
        );
        let session = test_session(runner.clone());

        let mut queue = session.transfer_queue();
        queue.enqueue(TransferJob::push(dir.path().join("missing.txt"), remote("/sdcard/missing.txt")));
        queue.enqueue(TransferJob::push(&a, remote("/sdcard/a.txt")));
        queue.enqueue(TransferJob::push(&b, remote("/sdcard/b.txt")));
        assert_eq!(queue.len(), 3);

        let mut finished = Vec::new();
        let summary = queue
            .run(|job, event| {
                if let TransferEvent::Finished(outcome) = event {
                    finished.push((job.display_name(), matches!(outcome, TransferOutcome::Completed { .. })));
                }
            })
            .await;

        assert_eq!(
            finished,
            vec![
                ("missing.txt".to_string(), false),
                ("a.txt".to_string(), true),
                ("b.txt".to_string(), true),
            ]
        );
        assert_eq!(summary.completed.len(), 2);
        assert_eq!(summary.failed.len(), 1);
        assert!(!summary.all_succeeded());

        let pushes: Vec<String> = runner
            .command_lines()
            .into_iter()
            .filter(|c| c.contains("push -p"))
            .collect();
        assert!(pushes[0].ends_with("/sdcard/a.txt.adbx-part"));
        assert!(pushes[1].ends_with("/sdcard/b.txt.adbx-part"));
        assert!(!session.is_transferring());
    }

    #[tokio::test]
    async fn test_cancelled_batch_skips_remaining_jobs() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        std::fs::write(&a, b"aaaa").unwrap();

        let runner = Arc::new(ScriptedRunner::new().on("push -p", Scripted::lines(&["[ 1%] a"], 0).hanging()));
        let session = test_session(runner.clone());

        let mut queue = session.transfer_queue();
        queue.enqueue(TransferJob::push(&a, remote("/sdcard/a.txt")));
        queue.enqueue(TransferJob::push(&a, remote("/sdcard/b.txt")));
        let token = queue.cancel_token();

        let summary = queue
            .run(|_, event| {
                if let TransferEvent::Progress(_) = event {
                    token.cancel();
                }
            })
            .await;

        assert!(summary.completed.is_empty());
        assert_eq!(summary.failed.len(), 2);
        assert!(summary.failed.iter().all(|f| f.error.contains("cancelled")));
        assert_eq!(
            runner.command_lines().iter().filter(|c| c.contains("push -p")).count(),
            1
        );
    }

    #[test]
    fn test_percent_parser() {
        let parser = PercentParser;
        assert_eq!(parser.parse("[ 42%] /sdcard/file.bin"), Some(42));
        assert_eq!(parser.parse("[100%] /sdcard/file.bin"), Some(100));
        assert_eq!(parser.parse("Transferring: 7 %"), Some(7));
        assert_eq!(parser.parse("/tmp/a: 1 file pushed, 0 skipped. 35.2 MB/s"), None);
        assert_eq!(parser.parse("bogus 1234%"), None);
        assert_eq!(parser.parse("weird 250%"), Some(100));
    }

    #[test]
    fn test_approx_bytes() {
        assert_eq!(approx_bytes(50, 1_000_000), 500_000);
        assert_eq!(approx_bytes(100, 1_000_000), 1_000_000);
        assert_eq!(approx_bytes(0, 1_000_000), 0);
        assert_eq!(approx_bytes(33, u64::MAX), (u64::MAX as u128 * 33 / 100) as u64);
    }
}

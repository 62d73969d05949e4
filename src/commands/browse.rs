use crate::commands::transfer::{plan_pull, plan_push, report, run_batch, skip_existing};
use crate::commands::SubCommand;
use crate::config::Settings;
use crate::core::context::CommandContext;
use crate::device::{DeviceSession, Listing};
use crate::error::{AdbxError, Result};
use crate::output::render_tree;
use crate::utils::split_words;
use async_trait::async_trait;
use log::*;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const DEFAULT_TREE_DEPTH: usize = 2;

const HELP: &str = "\
Commands:
  ls [path]                 list a directory (default: current)
  cd <path>                 enter a directory
  up                        go to the parent directory
  pwd                       print the current directory
  tree [depth]              show the directory tree below the current directory
  mkdir <path>              create a directory
  rm <path>                 remove a file or directory recursively
  cp <src> <dst>            copy on the device
  mv <src> <dst>            move or rename on the device
  push [-f] <local> [dir]   copy a local file or directory to the device
  pull [-f] <remote> [dir]  copy a remote file to the local machine
  help                      show this help
  exit                      leave the browser";

pub struct BrowseCommand;

#[derive(Debug, Clone, Default, clap::Args)]
pub struct BrowseArgs {
    /// Directory to start in, absolute or relative to the root
    pub path: Option<String>,
}

/// One line of browser input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    Ls(Option<String>),
    Cd(String),
    Up,
    Pwd,
    Tree(usize),
    Mkdir(String),
    Rm(String),
    Cp(String, String),
    Mv(String, String),
    Push {
        local: String,
        remote_dir: Option<String>,
        force: bool,
    },
    Pull {
        remote: String,
        local_dir: Option<String>,
        force: bool,
    },
    Help,
    Exit,
}

fn usage(text: &str) -> AdbxError {
    AdbxError::Other(format!("usage: {}", text))
}

impl BrowseAction {
    /// Parse a line of input, expanding an alias in the first word.
    /// Blank lines give `None`.
    pub fn parse(line: &str, settings: &Settings) -> Result<Option<Self>> {
        let mut words = split_words(line);
        if words.is_empty() {
            return Ok(None);
        }

        let first = words.remove(0);
        let mut expanded = split_words(&settings.resolve_alias(&first));
        expanded.extend(words);
        let (command, args) = match expanded.split_first() {
            Some((command, args)) => (command.as_str(), args),
            None => return Ok(None),
        };

        let force = args.iter().any(|a| a == "-f" || a == "--force");
        let operands: Vec<String> = args
            .iter()
            .filter(|a| !matches!(a.as_str(), "-f" | "--force"))
            .cloned()
            .collect();

        let action = match (command, operands.as_slice()) {
            ("ls", []) => BrowseAction::Ls(None),
            ("ls", [path]) => BrowseAction::Ls(Some(path.clone())),
            ("ls", _) => return Err(usage("ls [path]")),
            ("cd", [path]) => BrowseAction::Cd(path.clone()),
            ("cd", _) => return Err(usage("cd <path>")),
            ("up", []) | ("..", []) => BrowseAction::Up,
            ("pwd", []) => BrowseAction::Pwd,
            ("tree", []) => BrowseAction::Tree(DEFAULT_TREE_DEPTH),
            ("tree", [depth]) => match depth.parse::<usize>() {
                Ok(d) if d > 0 => BrowseAction::Tree(d),
                _ => return Err(usage("tree [depth], depth >= 1")),
            },
            ("mkdir", [path]) => BrowseAction::Mkdir(path.clone()),
            ("mkdir", _) => return Err(usage("mkdir <path>")),
            ("rm", [path]) => BrowseAction::Rm(path.clone()),
            ("rm", _) => return Err(usage("rm <path>")),
            ("cp", [src, dst]) => BrowseAction::Cp(src.clone(), dst.clone()),
            ("cp", _) => return Err(usage("cp <src> <dst>")),
            ("mv", [src, dst]) => BrowseAction::Mv(src.clone(), dst.clone()),
            ("mv", _) => return Err(usage("mv <src> <dst>")),
            ("push", [local]) => BrowseAction::Push {
                local: local.clone(),
                remote_dir: None,
                force,
            },
            ("push", [local, dir]) => BrowseAction::Push {
                local: local.clone(),
                remote_dir: Some(dir.clone()),
                force,
            },
            ("push", _) => return Err(usage("push [-f] <local> [remote_dir]")),
            ("pull", [remote]) => BrowseAction::Pull {
                remote: remote.clone(),
                local_dir: None,
                force,
            },
            ("pull", [remote, dir]) => BrowseAction::Pull {
                remote: remote.clone(),
                local_dir: Some(dir.clone()),
                force,
            },
            ("pull", _) => return Err(usage("pull [-f] <remote> [local_dir]")),
            ("help", _) | ("?", _) => BrowseAction::Help,
            ("exit", _) | ("quit", _) => BrowseAction::Exit,
            (other, _) => {
                return Err(AdbxError::Other(format!(
                    "unknown command: {} (type 'help')",
                    other
                )))
            }
        };
        Ok(Some(action))
    }
}

/// Interactive state: the session plus the last listing of the current directory
pub struct Browser<'a> {
    ctx: &'a CommandContext,
    session: DeviceSession,
    cached: Option<Listing>,
}

impl<'a> Browser<'a> {
    pub fn new(ctx: &'a CommandContext, session: DeviceSession) -> Self {
        Self {
            ctx,
            session,
            cached: None,
        }
    }

    pub fn session(&self) -> &DeviceSession {
        &self.session
    }

    pub fn prompt(&self) -> String {
        format!("{}:{}$ ", self.session.device().id, self.session.current_path())
    }

    /// Listing of the current directory, reusing the cached one while it
    /// still describes the current path
    pub async fn current_listing(&mut self) -> Result<&Listing> {
        let fresh = match self.cached.take() {
            Some(listing) if self.session.is_current(&listing) => listing,
            Some(stale) => {
                debug!("Discarding stale listing of {}", stale.path);
                self.session.refresh().await?
            }
            None => self.session.refresh().await?,
        };
        Ok(self.cached.insert(fresh))
    }

    fn invalidate(&mut self) {
        self.cached = None;
    }

    fn show(&self, listing: &Listing) -> Result<()> {
        self.ctx
            .formatter()
            .render(self.ctx.output_format, &listing.entries)
    }

    /// Run one action. Returns `false` when the user asked to leave.
    pub async fn execute(&mut self, action: BrowseAction) -> Result<bool> {
        let formatter = self.ctx.formatter();

        match action {
            BrowseAction::Ls(None) => {
                let listing = self.current_listing().await?.clone();
                self.show(&listing)?;
            }
            BrowseAction::Ls(Some(path)) => {
                let listing = self.session.list_directory(&self.session.resolve(&path)).await?;
                self.show(&listing)?;
            }
            BrowseAction::Cd(path) => {
                let listing = self.session.change_directory(&path).await?;
                self.cached = Some(listing);
            }
            BrowseAction::Up => {
                if !self.session.go_up() {
                    formatter.info(&format!("Already at {}", self.session.root()))?;
                }
            }
            BrowseAction::Pwd => formatter.message(self.session.current_path().as_str())?,
            BrowseAction::Tree(depth) => {
                let tree = self
                    .session
                    .list_tree(self.session.current_path(), depth)
                    .await?;
                formatter.message(&render_tree(&tree).join("\n"))?;
            }
            BrowseAction::Mkdir(path) => {
                self.invalidate();
                self.session.make_directory(&self.session.resolve(&path)).await?;
            }
            BrowseAction::Rm(path) => {
                let target = self.session.resolve(&path);
                if target.is_root() || &target == self.session.root() {
                    return Err(AdbxError::InvalidPath(format!("refusing to remove {}", target)));
                }
                self.invalidate();
                self.session.remove_recursive(&target).await?;
            }
            BrowseAction::Cp(src, dst) => {
                self.invalidate();
                self.session
                    .copy(&self.session.resolve(&src), &self.session.resolve(&dst))
                    .await?;
            }
            BrowseAction::Mv(src, dst) => {
                self.invalidate();
                self.session
                    .move_path(&self.session.resolve(&src), &self.session.resolve(&dst))
                    .await?;
            }
            BrowseAction::Push {
                local,
                remote_dir,
                force,
            } => {
                let remote_dir = match remote_dir {
                    Some(dir) => self.session.resolve(&dir),
                    None => self.session.current_path().clone(),
                };
                let plan = plan_push(&[PathBuf::from(local)], &remote_dir, true)?;
                self.invalidate();
                for dir in &plan.directories {
                    self.session.make_directory(dir).await?;
                }
                let (jobs, skipped) = skip_existing(&self.session, plan.jobs, force).await?;
                let summary = run_batch(self.ctx, &self.session, jobs).await;
                report(self.ctx, &summary, skipped)?;
            }
            BrowseAction::Pull {
                remote,
                local_dir,
                force,
            } => {
                let local_dir = PathBuf::from(local_dir.unwrap_or_else(|| ".".to_string()));
                let jobs = plan_pull(&[self.session.resolve(&remote)], &local_dir)?;
                let (jobs, skipped) = skip_existing(&self.session, jobs, force).await?;
                let summary = run_batch(self.ctx, &self.session, jobs).await;
                report(self.ctx, &summary, skipped)?;
            }
            BrowseAction::Help => formatter.message(HELP)?,
            BrowseAction::Exit => return Ok(false),
        }
        Ok(true)
    }

    /// Read and execute commands until `exit`, end of input, or `interrupt`
    /// resolving while waiting at the prompt.
    ///
    /// `interrupt` is called afresh for every prompt, so an interrupt that
    /// cancelled a transfer does not also end the browser.
    pub async fn run_loop<R, F, Fut>(&mut self, input: R, mut interrupt: F) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        let formatter = self.ctx.formatter();
        let mut lines = input.lines();

        loop {
            print!("{}", self.prompt());
            std::io::stdout().flush()?;

            let line = tokio::select! {
                biased;
                _ = interrupt() => {
                    println!();
                    break;
                }
                line = lines.next_line() => match line? {
                    Some(line) => line,
                    // EOF
                    None => break,
                },
            };

            let action = match BrowseAction::parse(&line, &self.ctx.settings) {
                Ok(Some(action)) => action,
                Ok(None) => continue,
                Err(e) => {
                    formatter.error(&e.to_string())?;
                    continue;
                }
            };

            match self.execute(action).await {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => formatter.error(&e.to_string())?,
            }
        }

        Ok(())
    }
}

impl BrowseCommand {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubCommand for BrowseCommand {
    type Args = BrowseArgs;

    async fn run(&self, ctx: &CommandContext, args: Self::Args) -> Result<()> {
        let mut session = ctx.open_session().await?;
        if let Some(path) = args.path.as_deref() {
            session.change_directory(path).await?;
        }

        let mut browser = Browser::new(ctx, session);
        ctx.formatter().info(&format!(
            "Browsing {} on {}. Type 'help' for commands, 'exit' or Ctrl-C to quit.",
            browser.session().current_path(),
            browser.session().device().id
        ))?;

        let stdin = BufReader::new(tokio::io::stdin());
        browser
            .run_loop(stdin, || async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
    }
}

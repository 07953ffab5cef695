use std::any::Any;
use std::backtrace::Backtrace;
use std::future::Future;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, warn};

use crate::services::cleanup::CleanupHandle;
use crate::utils::error::{CliError, Result};

/// Set while a process-wide guard is alive
static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Exit code of every fault path
pub const FAULT_EXIT_CODE: i32 = 1;

/// Signals that abort a supervised run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// Ctrl-C
    Interrupt,
    /// SIGTERM
    Terminate,
}

/// Which fault class ended a supervised run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// A panic escaped the work
    Uncaught,
    /// The work failed with an error nobody expected
    UnhandledFailure,
    /// The work failed with a [`CliError`]
    Expected,
    Interrupted,
    Terminated,
}

/// Outcome of a failed supervised run. Cleanup has already been attempted
/// by the time a caller sees one of these.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Fault {
    kind: FaultKind,
    message: String,
    exit_code: i32,
}

impl Fault {
    fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            exit_code: FAULT_EXIT_CODE,
        }
    }

    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

/// Routes every way a run can die to a single cleanup.
///
/// [`ProcessLifecycleGuard::install`] registers the process-wide panic hook
/// and the Ctrl-C / SIGTERM listeners, and may only be active once at a time.
/// Dropping the guard restores the default panic hook and stops the listener.
/// [`ProcessLifecycleGuard::detached`] skips the process-wide registration so
/// independent guards can coexist (tests, embedding).
#[derive(Debug)]
pub struct ProcessLifecycleGuard {
    cleanup: CleanupHandle,
    owns_process_hooks: bool,
    signals: Option<SignalRouting>,
}

/// Hands each signal to the running supervision, or handles it directly
/// when nothing is being supervised.
#[derive(Debug)]
struct SignalRouting {
    claim: Arc<Mutex<Option<oneshot::Sender<ShutdownSignal>>>>,
    listener: JoinHandle<()>,
}

impl SignalRouting {
    fn arm(handle: &Handle, cleanup: CleanupHandle) -> Self {
        let mut signals = SignalListener::new();
        let claim: Arc<Mutex<Option<oneshot::Sender<ShutdownSignal>>>> = Arc::default();
        let listener_claim = Arc::clone(&claim);

        let listener = handle.spawn(async move {
            let signal = signals.recv().await;
            let supervisor = listener_claim.lock().ok().and_then(|mut slot| slot.take());
            let unclaimed = match supervisor {
                Some(tx) => tx.send(signal).err(),
                None => Some(signal),
            };

            if let Some(signal) = unclaimed {
                let (_, message) = announce(signal);
                let _ = cleanup.cleanup().await;
                error!("{}", message);
                std::process::exit(FAULT_EXIT_CODE);
            }
        });

        Self { claim, listener }
    }

    /// Route the next signal to the returned receiver
    fn subscribe(&self) -> oneshot::Receiver<ShutdownSignal> {
        let (tx, rx) = oneshot::channel();
        if let Ok(mut slot) = self.claim.lock() {
            *slot = Some(tx);
        }
        rx
    }

    fn unsubscribe(&self) {
        if let Ok(mut slot) = self.claim.lock() {
            slot.take();
        }
    }
}

impl ProcessLifecycleGuard {
    /// Install the process-wide handlers for `path`.
    ///
    /// Pass `None` when there is nothing to clean up (dry runs). Signal
    /// listeners are only armed when called inside a Tokio runtime.
    pub fn install(path: Option<PathBuf>) -> Result<Self> {
        if INSTALLED.swap(true, Ordering::SeqCst) {
            return Err(CliError::new("Process lifecycle guard is already installed"));
        }

        let cleanup = CleanupHandle::new(path);
        let hook_cleanup = cleanup.clone();
        panic::set_hook(Box::new(move |info| {
            error!("Unexpected error occurred:");
            error!("{}", panic_message(info.payload()));
            if let Some(location) = info.location() {
                debug!("Panicked at {}", location);
            }
            debug!("{}", Backtrace::force_capture());

            let _ = hook_cleanup.cleanup_blocking();
            std::process::exit(FAULT_EXIT_CODE);
        }));

        let signals = match Handle::try_current() {
            Ok(handle) => Some(SignalRouting::arm(&handle, cleanup.clone())),
            Err(_) => {
                debug!("No async runtime, signal listeners not armed");
                None
            }
        };

        debug!("Process lifecycle guard installed");
        Ok(Self {
            cleanup,
            owns_process_hooks: true,
            signals,
        })
    }

    /// Guard that registers nothing process-wide
    pub fn detached(path: Option<PathBuf>) -> Self {
        Self {
            cleanup: CleanupHandle::new(path),
            owns_process_hooks: false,
            signals: None,
        }
    }

    pub fn cleanup_handle(&self) -> CleanupHandle {
        self.cleanup.clone()
    }

    pub fn path(&self) -> Option<&Path> {
        self.cleanup.path()
    }

    /// Run `work` until it finishes or the process receives Ctrl-C / SIGTERM
    pub async fn supervise<F, T>(&self, work: F) -> std::result::Result<T, Fault>
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let Some(routing) = &self.signals else {
            return self.supervise_until(work, shutdown_signal()).await;
        };

        let claimed = routing.subscribe();
        let shutdown = async move {
            match claimed.await {
                Ok(signal) => signal,
                Err(_) => std::future::pending().await,
            }
        };
        let outcome = self.supervise_until(work, shutdown).await;
        routing.unsubscribe();
        outcome
    }

    /// Run `work` until it finishes or `shutdown` resolves.
    ///
    /// On a signal the task is aborted in place and cleanup starts at once.
    pub async fn supervise_until<F, T, S>(&self, work: F, shutdown: S) -> std::result::Result<T, Fault>
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
        T: Send + 'static,
        S: Future<Output = ShutdownSignal>,
    {
        let mut task = tokio::spawn(work);

        tokio::select! {
            joined = &mut task => match joined {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(err)) => Err(self.on_failure(err).await),
                Err(join_error) => Err(self.on_join_error(join_error).await),
            },
            signal = shutdown => {
                task.abort();
                Err(self.on_signal(signal).await)
            }
        }
    }

    async fn on_failure(&self, err: anyhow::Error) -> Fault {
        if let Some(cli_error) = err.downcast_ref::<CliError>() {
            if cli_error.is_expected() {
                error!("{}", cli_error);
                let _ = self.cleanup.cleanup().await;
                let mut fault = Fault::new(FaultKind::Expected, cli_error.to_string());
                fault.exit_code = cli_error.exit_code();
                return fault;
            }
        }

        error!("Unhandled failure:");
        error!("{}", err);
        debug!("{:?}", err);
        let _ = self.cleanup.cleanup().await;
        Fault::new(FaultKind::UnhandledFailure, err.to_string())
    }

    async fn on_join_error(&self, join_error: JoinError) -> Fault {
        let message = if join_error.is_panic() {
            panic_message(join_error.into_panic().as_ref())
        } else {
            "Generation task was cancelled".to_string()
        };

        error!("Unexpected error occurred:");
        error!("{}", message);
        let _ = self.cleanup.cleanup().await;
        Fault::new(FaultKind::Uncaught, message)
    }

    async fn on_signal(&self, signal: ShutdownSignal) -> Fault {
        let (kind, message) = announce(signal);
        let _ = self.cleanup.cleanup().await;
        error!("{}", message);
        Fault::new(kind, message)
    }
}

impl Drop for ProcessLifecycleGuard {
    fn drop(&mut self) {
        if let Some(routing) = &self.signals {
            routing.listener.abort();
        }
        if self.owns_process_hooks {
            if !std::thread::panicking() {
                // Dropping the returned hook reinstates the default one
                let _ = panic::take_hook();
            }
            INSTALLED.store(false, Ordering::SeqCst);
            debug!("Process lifecycle guard removed");
        }
    }
}

fn announce(signal: ShutdownSignal) -> (FaultKind, &'static str) {
    match signal {
        ShutdownSignal::Interrupt => {
            warn!("Operation cancelled by user");
            (FaultKind::Interrupted, "Operation cancelled")
        }
        ShutdownSignal::Terminate => {
            warn!("Process terminated");
            (FaultKind::Terminated, "Process terminated")
        }
    }
}

/// Ctrl-C and SIGTERM streams, registered with the OS on construction.
///
/// Must be created inside a Tokio runtime.
#[derive(Debug)]
pub struct SignalListener {
    #[cfg(unix)]
    interrupt: Option<tokio::signal::unix::Signal>,
    #[cfg(unix)]
    terminate: Option<tokio::signal::unix::Signal>,
}

impl SignalListener {
    pub fn new() -> Self {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let listen = |kind: SignalKind, name: &str| match signal(kind) {
                Ok(stream) => Some(stream),
                Err(e) => {
                    warn!("Could not listen for {}: {}", name, e);
                    None
                }
            };
            Self {
                interrupt: listen(SignalKind::interrupt(), "Ctrl-C"),
                terminate: listen(SignalKind::terminate(), "SIGTERM"),
            }
        }

        #[cfg(not(unix))]
        {
            Self {}
        }
    }

    /// Resolves on the next Ctrl-C or SIGTERM
    pub async fn recv(&mut self) -> ShutdownSignal {
        #[cfg(unix)]
        {
            tokio::select! {
                () = next_delivery(self.interrupt.as_mut()) => ShutdownSignal::Interrupt,
                () = next_delivery(self.terminate.as_mut()) => ShutdownSignal::Terminate,
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Could not listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            ShutdownSignal::Interrupt
        }
    }
}

#[cfg(unix)]
async fn next_delivery(stream: Option<&mut tokio::signal::unix::Signal>) {
    if let Some(stream) = stream {
        if stream.recv().await.is_some() {
            return;
        }
    }
    std::future::pending::<()>().await;
}

impl Default for SignalListener {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves on the first Ctrl-C or SIGTERM delivered to the process
pub async fn shutdown_signal() -> ShutdownSignal {
    SignalListener::new().recv().await
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unknown panic".to_string()
    }
}

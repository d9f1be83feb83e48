use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::*;

type CallResult = Result<Reply, RemoteError>;

/// The UI thread's end of the control thread: calls go out, results come back in the
/// order they were sent. Dropping it stops the thread after its current call.
pub(super) struct Worker {
    calls: Sender<Call>,
    results: Receiver<CallResult>,
}

pub(super) fn spawn<A>(api: A) -> Result<Worker>
where
    A: TaskApi + Send + 'static,
{
    let (calls, call_rx) = mpsc::channel::<Call>();
    let (result_tx, results) = mpsc::channel::<CallResult>();

    std::thread::Builder::new()
        .name("neona-control".to_string())
        .spawn(move || {
            for call in call_rx {
                tracing::debug!(call = ?call, "executing");
                let result = call.execute(&api);
                if result_tx.send(result).is_err() {
                    break;
                }
            }
            tracing::debug!("control thread exiting");
        })
        .context("spawn control thread")?;

    Ok(Worker { calls, results })
}

impl Worker {
    /// Gives the call back if the control thread has exited.
    pub(super) fn send(&self, call: Call) -> std::result::Result<(), Call> {
        self.calls.send(call).map_err(|err| err.0)
    }

    /// `Ok(None)` when nothing is ready; `Err(())` once the control thread is gone.
    pub(super) fn try_recv(&self) -> std::result::Result<Option<CallResult>, ()> {
        match self.results.try_recv() {
            Ok(result) => Ok(Some(result)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(()),
        }
    }
}

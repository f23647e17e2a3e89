//! Bounded pool of worker threads draining a shared work source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use anyhow::Result;

/// Shared container workers pop from until it is empty.
pub trait WorkSource<T>: Send + Sync {
    fn pop(&self) -> Option<T>;
    /// Remove everything still queued; returns how many were removed.
    fn drain(&self) -> usize;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Run `work` on every element of `source` with `min(threads, len)` workers.
///
/// Results come back in completion order. If `work` returns an error the
/// remaining workers stop taking work, the source is drained, and the first
/// error is returned once every worker has exited.
pub(crate) fn run_pool<T, R, S, F>(source: Arc<S>, threads: usize, work: F) -> Result<Vec<(T, R)>>
where
    T: Send + 'static,
    R: Send + 'static,
    S: WorkSource<T> + 'static,
    F: Fn(&T) -> Result<R> + Send + Sync + 'static,
{
    let count = source.len();
    let num_workers = threads.max(1).min(count);
    let abort_requested = Arc::new(AtomicBool::new(false));
    let work = Arc::new(work);
    let (tx, rx) = mpsc::channel();
    let mut handles = Vec::with_capacity(num_workers);
    for _ in 0..num_workers {
        let source = Arc::clone(&source);
        let abort = Arc::clone(&abort_requested);
        let work = Arc::clone(&work);
        let tx = tx.clone();
        handles.push(std::thread::spawn(move || loop {
            if abort.load(Ordering::Relaxed) {
                break;
            }
            let Some(unit) = source.pop() else {
                break;
            };
            let res = work(&unit);
            if tx.send((unit, res)).is_err() {
                break;
            }
        }));
    }
    drop(tx);

    let mut results = Vec::with_capacity(count);
    let mut first_error: Option<anyhow::Error> = None;
    let mut to_receive = count;
    while to_receive > 0 {
        let (unit, res) = match rx.recv() {
            Ok(pair) => pair,
            Err(_) => {
                if first_error.is_none() {
                    first_error = Some(anyhow::anyhow!(
                        "worker result channel closed (worker may have panicked)"
                    ));
                }
                break;
            }
        };
        to_receive -= 1;
        match res {
            Ok(r) => results.push((unit, r)),
            Err(e) => {
                abort_requested.store(true, Ordering::Relaxed);
                to_receive = to_receive.saturating_sub(source.drain());
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    for h in handles {
        if let Err(e) = h.join() {
            if first_error.is_none() {
                first_error = Some(anyhow::anyhow!("worker panicked: {:?}", e));
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(results),
    }
}

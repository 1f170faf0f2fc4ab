use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tether_core::prelude::*;

/// Spawn a worker that announces itself, then do one bounded wait on a local
/// condition variable; nobody notifies it, so the wait ends by timeout.
fn timed_wait_demo() -> Result<()> {
    println!("timed_wait_demo");

    let mut worker = InterruptibleThread::new(|| {
        println!("timed_wait_demo::worker");
        Ok(())
    })?;

    let cv = Arc::new(Condvar::new());
    let m = Mutex::new(());
    let mut guard = m.lock();
    let start = Instant::now();
    InterruptibleThread::interruptible_wait(&cv, &mut guard)?;
    println!("wait returned after {:?}", start.elapsed());

    worker.join()
}

/// Park a worker in an interruptible wait loop and interrupt it from here.
fn interrupt_demo() -> Result<()> {
    println!("interrupt_demo");

    let mut worker = InterruptibleThread::with_config(
        &ThreadConfig::new().named("parked-worker"),
        || {
            println!("interrupt_demo::worker");
            let cv = Arc::new(Condvar::new());
            let m = Mutex::new(0_u64);
            let mut wakes = m.lock();
            loop {
                if let Err(e) = interruptible_wait(&cv, &mut wakes) {
                    println!("worker stopping after {} timed waits", *wakes);
                    return Err(e);
                }
                *wakes += 1;
            }
        },
    )?;

    std::thread::sleep(Duration::from_millis(20));
    worker.interrupt();

    match worker.join() {
        Err(Error::Interrupted) => {
            println!("worker interrupted");
            Ok(())
        }
        other => other,
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    timed_wait_demo()?;
    println!();
    interrupt_demo()?;

    tracing::info!("demos finished");
    Ok(())
}

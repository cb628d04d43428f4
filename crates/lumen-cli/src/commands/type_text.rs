use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::oneshot;
use tokio::task::LocalSet;

use lumen_core::host::{LocalTokioScheduler, Scheduler, VirtualScheduler};
use lumen_core::{Typewriter, TypewriterOptions};

/// Every displayed prefix with the clock reading at which it appeared
pub fn timeline(text: &str, options: TypewriterOptions) -> Vec<(Duration, String)> {
    let clock = Rc::new(VirtualScheduler::new());
    let frames = Rc::new(RefCell::new(vec![(Duration::ZERO, String::new())]));

    let typewriter = Typewriter::new(clock.clone(), text, options);
    let recorder = frames.clone();
    let stamp = clock.clone();
    let _sub = typewriter.subscribe(move |shown| {
        recorder.borrow_mut().push((stamp.now(), shown.clone()));
    });

    while !typewriter.is_complete() {
        let Some(deadline) = clock.next_deadline() else {
            break;
        };
        clock.advance_to(deadline);
    }

    frames.take()
}

pub fn run(text: &str, options: TypewriterOptions) -> Result<()> {
    let frames = timeline(text, options);
    let mut stdout = io::stdout().lock();
    for (at, shown) in &frames {
        writeln!(stdout, "t={} {:?}", at.as_millis(), shown)?;
    }
    match frames.last() {
        Some((at, _)) if !text.is_empty() => writeln!(stdout, "complete at t={}", at.as_millis())?,
        _ => writeln!(stdout, "nothing to type")?,
    }
    Ok(())
}

/// Type `text` onto the terminal in real time
pub async fn live(text: &str, options: TypewriterOptions) -> Result<()> {
    let text = text.to_string();
    LocalSet::new()
        .run_until(async move {
            if text.is_empty() {
                return Ok(());
            }

            let scheduler = Rc::new(LocalTokioScheduler::new());
            let typewriter = Typewriter::new(scheduler, text.as_str(), options);

            let (tx, rx) = oneshot::channel();
            let mut tx = Some(tx);
            let _done = typewriter.on_complete(move || {
                if let Some(tx) = tx.take() {
                    let _ = tx.send(());
                }
            });
            let _echo = typewriter.subscribe(|shown| {
                let mut stdout = io::stdout().lock();
                let _ = write!(stdout, "\r{shown}▌");
                let _ = stdout.flush();
            });

            print!("▌");
            io::stdout().flush()?;
            rx.await?;
            println!("\r{text} ");
            Ok(())
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_timeline_for_hi() {
        let frames = timeline("Hi", TypewriterOptions::from_millis(50, 300));
        assert_eq!(
            frames,
            vec![
                (ms(0), String::new()),
                (ms(350), "H".to_string()),
                (ms(400), "Hi".to_string()),
            ]
        );
    }

    #[test]
    fn test_timeline_with_negative_timing() {
        let frames = timeline("ab", TypewriterOptions::from_millis(-10, -5));
        assert_eq!(frames.last(), Some(&(ms(0), "ab".to_string())));
    }

    #[test]
    fn test_timeline_for_empty_text() {
        assert_eq!(
            timeline("", TypewriterOptions::default()),
            vec![(ms(0), String::new())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_finishes() {
        live("ok", TypewriterOptions::from_millis(10, 0)).await.unwrap();
    }
}

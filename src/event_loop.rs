use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// The single place input is polled.
///
/// The handler sees `Some(event)` for every input event and `None` once per
/// idle tick, which is where the caller redraws. Bursts (drags, scrolling)
/// are drained before the next tick so rendering never trails the pointer.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn poll(&mut self) -> io::Result<Option<Event>> {
        if self.driver.poll(self.poll_interval)? {
            Ok(Some(self.driver.read()?))
        } else {
            Ok(None)
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if handler(&mut self.driver, None)? == ControlFlow::Quit {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                loop {
                    let event = self.driver.read()?;
                    if handler(&mut self.driver, Some(event))? == ControlFlow::Quit {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct Scripted {
        events: VecDeque<Event>,
    }

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn drains_bursts_between_ticks() {
        let driver = Scripted {
            events: VecDeque::from(vec![key('a'), key('b'), key('q')]),
        };
        let mut ev = EventLoop::new(driver, Duration::from_millis(0));
        let mut seen = Vec::new();
        ev.run(|_, event| {
            match event {
                None => seen.push("tick".to_string()),
                Some(Event::Key(k)) => {
                    if k.code == KeyCode::Char('q') {
                        return Ok(ControlFlow::Quit);
                    }
                    seen.push(format!("{:?}", k.code));
                }
                Some(_) => {}
            }
            Ok(ControlFlow::Continue)
        })
        .unwrap();
        assert_eq!(seen, vec!["tick", "Char('a')", "Char('b')"]);
    }

    #[test]
    fn poll_returns_none_when_idle() {
        let driver = Scripted {
            events: VecDeque::new(),
        };
        let mut ev = EventLoop::new(driver, Duration::from_millis(0));
        assert!(ev.poll().unwrap().is_none());
    }
}

pub mod console;
pub mod keyboard;
pub mod pointer;

use std::io;
use std::time::Duration;

use crossterm::event::Event;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

pub use pointer::PointerTranslator;

pub trait InputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool>;
    fn read(&mut self) -> io::Result<Event>;
    fn set_mouse_capture(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        (**self).poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        (**self).read()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        (**self).set_mouse_capture(enabled)
    }
}

/// Where frames end up. The console driver draws to the terminal; tests
/// draw into a plain buffer.
pub trait OutputDriver {
    fn enter(&mut self) -> io::Result<()>;
    fn exit(&mut self) -> io::Result<()>;
    fn size(&self) -> io::Result<Rect>;
    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut crate::ui::UiFrame<'_>);
}

/// Offscreen output of a fixed size.
#[derive(Debug)]
pub struct BufferOutputDriver {
    buffer: Buffer,
}

impl BufferOutputDriver {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }
}

impl OutputDriver for BufferOutputDriver {
    fn enter(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn size(&self) -> io::Result<Rect> {
        Ok(self.buffer.area)
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut crate::ui::UiFrame<'_>),
    {
        let area = self.buffer.area;
        self.buffer.reset();
        let mut frame = crate::ui::UiFrame::from_parts(area, &mut self.buffer);
        f(&mut frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct Dummy;
    impl InputDriver for Dummy {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(true)
        }

        fn read(&mut self) -> io::Result<Event> {
            Ok(Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)))
        }
    }

    fn first_event<D: InputDriver>(mut driver: D) -> Option<Event> {
        if driver.poll(Duration::from_millis(0)).ok()? {
            driver.read().ok()
        } else {
            None
        }
    }

    #[test]
    fn blanket_impl_for_mut_ref_works() {
        let mut d = Dummy;
        let Some(Event::Key(k)) = first_event(&mut d) else {
            panic!("expected key");
        };
        assert_eq!(k.code, KeyCode::Char('x'));
    }

    #[test]
    fn buffer_driver_draws_offscreen() {
        let mut out = BufferOutputDriver::new(10, 2);
        out.draw(|frame| frame.set_string(1, 1, "hi", ratatui::style::Style::default()))
            .unwrap();
        assert_eq!(out.buffer()[(1, 1)].symbol(), "h");
        assert_eq!(out.size().unwrap(), Rect::new(0, 0, 10, 2));
    }
}

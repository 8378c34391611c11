//! [`DisplayDriver`] that forwards requests as JSON lines.
//!
//! gridwm does not speak any display-server protocol itself.  The daemon
//! writes every driver call to stdout, one JSON object per line, and a small
//! adapter on the other end of the pipe applies it to the actual server:
//!
//! ```json
//! {"request":"move","window":10,"x":0,"y":0}
//! {"request":"resize","window":10,"width":960,"height":1080}
//! {"request":"focus","window":10}
//! {"request":"kill","window":10}
//! ```

use crate::traits::DisplayDriver;
use crate::WindowId;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::io::{self, Write};

/// One call to the display server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum DriverRequest {
    Move { window: WindowId, x: i32, y: i32 },
    Resize {
        window: WindowId,
        width: i32,
        height: i32,
    },
    Focus { window: WindowId },
    Kill { window: WindowId },
}

/// Errors that can occur when writing a request.
#[derive(Debug, thiserror::Error)]
#[error("display driver error: {0}")]
pub struct DriverError(String);

/// Writes each [`DriverRequest`] as a line of JSON to `W`.
///
/// Every line is flushed immediately so the adapter sees it without delay.
pub struct JsonLinesDriver<W: Write> {
    out: RefCell<W>,
}

impl JsonLinesDriver<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesDriver<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn send(&self, request: DriverRequest) -> Result<(), DriverError> {
        let line = serde_json::to_string(&request)
            .map_err(|e| DriverError(format!("encode: {}", e)))?;
        let mut out = self.out.borrow_mut();
        writeln!(out, "{}", line).map_err(|e| DriverError(format!("write: {}", e)))?;
        out.flush().map_err(|e| DriverError(format!("flush: {}", e)))
    }
}

impl<W: Write> DisplayDriver for JsonLinesDriver<W> {
    type Error = DriverError;

    fn move_window(&self, id: WindowId, x: i32, y: i32) -> Result<(), DriverError> {
        self.send(DriverRequest::Move { window: id, x, y })
    }

    fn resize_window(&self, id: WindowId, width: i32, height: i32) -> Result<(), DriverError> {
        self.send(DriverRequest::Resize {
            window: id,
            width,
            height,
        })
    }

    fn focus_window(&self, id: WindowId) -> Result<(), DriverError> {
        self.send(DriverRequest::Focus { window: id })
    }

    fn kill_window(&self, id: WindowId) -> Result<(), DriverError> {
        self.send(DriverRequest::Kill { window: id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(driver: JsonLinesDriver<Vec<u8>>) -> Vec<String> {
        String::from_utf8(driver.into_inner())
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn requests_are_written_one_per_line() {
        let driver = JsonLinesDriver::new(Vec::new());
        driver.move_window(10, -5, 7).unwrap();
        driver.resize_window(10, 800, 600).unwrap();
        driver.focus_window(10).unwrap();
        driver.kill_window(10).unwrap();
        assert_eq!(
            lines(driver),
            vec![
                r#"{"request":"move","window":10,"x":-5,"y":7}"#,
                r#"{"request":"resize","window":10,"width":800,"height":600}"#,
                r#"{"request":"focus","window":10}"#,
                r#"{"request":"kill","window":10}"#,
            ]
        );
    }

    #[test]
    fn request_parses_back() {
        let req: DriverRequest =
            serde_json::from_str(r#"{"request":"focus","window":3}"#).unwrap();
        assert_eq!(req, DriverRequest::Focus { window: 3 });
    }

    /// Writer whose every write fails.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_surface_as_driver_errors() {
        let driver = JsonLinesDriver::new(Broken);
        let err = driver.focus_window(1).unwrap_err();
        assert!(err.to_string().starts_with("display driver error: write:"));
    }
}

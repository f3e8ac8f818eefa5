//! Rendering targets for notifications.

use super::{Notification, NotificationId};
use crate::errors::VelixaError;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// Where notifications are drawn. The center owns lifecycle and timing;
/// a surface only renders and removes.
pub trait NotificationSurface: Send + Sync {
    fn render(&self, notification: &Notification) -> Result<(), VelixaError>;
    fn remove(&self, id: NotificationId) -> Result<(), VelixaError>;
}

/// Writes one `[kind] message` line per notification.
pub struct TerminalSurface<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl TerminalSurface<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> NotificationSurface for TerminalSurface<W> {
    fn render(&self, notification: &Notification) -> Result<(), VelixaError> {
        let mut writer = self.writer.lock();
        writeln!(writer, "[{}] {}", notification.kind, notification.message)?;
        writer.flush()?;
        Ok(())
    }

    fn remove(&self, id: NotificationId) -> Result<(), VelixaError> {
        // Printed lines stay on screen.
        log::trace!("Notification {} expired on terminal surface", id);
        Ok(())
    }
}

/// Keeps the currently visible notifications in memory.
#[derive(Clone, Default)]
pub struct MemorySurface {
    visible: Arc<Mutex<Vec<Notification>>>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(&self) -> Vec<Notification> {
        self.visible.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.visible
            .lock()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }
}

impl NotificationSurface for MemorySurface {
    fn render(&self, notification: &Notification) -> Result<(), VelixaError> {
        self.visible.lock().push(notification.clone());
        Ok(())
    }

    fn remove(&self, id: NotificationId) -> Result<(), VelixaError> {
        self.visible.lock().retain(|n| n.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{NotificationKind, NotificationOptions};

    fn sample(id: NotificationId, kind: NotificationKind, message: &str) -> Notification {
        Notification {
            id,
            kind,
            message: message.to_string(),
            options: NotificationOptions::default(),
        }
    }

    #[test]
    fn test_terminal_surface_writes_line() {
        let surface = TerminalSurface::new(Vec::new());
        surface
            .render(&sample(1, NotificationKind::Warning, "Disk almost full"))
            .unwrap();
        surface.remove(1).unwrap();

        let output = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(output, "[warning] Disk almost full\n");
    }

    #[test]
    fn test_memory_surface_tracks_visible() {
        let surface = MemorySurface::new();
        surface.render(&sample(1, NotificationKind::Info, "one")).unwrap();
        surface.render(&sample(2, NotificationKind::Error, "two")).unwrap();
        surface.remove(1).unwrap();

        assert_eq!(surface.messages(), vec!["two".to_string()]);
        assert_eq!(surface.visible()[0].kind, NotificationKind::Error);
    }
}

//! System clipboard for `CopyToClipboard`.

use arboard::Clipboard;

use super::error::ExecError;

/// Opened lazily on the first copy; headless sessions never touch it.
pub struct ClipboardHandler {
    clipboard: Clipboard,
}

impl ClipboardHandler {
    pub fn open() -> Result<Self, ExecError> {
        let clipboard = Clipboard::new().map_err(|e| ExecError::Clipboard(e.to_string()))?;
        Ok(Self { clipboard })
    }

    pub fn set_text(&mut self, text: &str) -> Result<(), ExecError> {
        self.clipboard
            .set_text(text.to_string())
            .map_err(|e| ExecError::Clipboard(format!("failed to set text: {e}")))
    }
}

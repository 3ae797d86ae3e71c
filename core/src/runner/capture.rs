use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared byte sink for one output stream.
///
/// Unlike a tail buffer this keeps everything: remediation logs must be shown in full.
/// It is shared with the pump task so whatever arrived before a kill is still readable.
#[derive(Clone, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, data: &[u8]) {
        self.lock().extend_from_slice(data);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.lock().clone()
    }

    /// Decode as UTF-8, replacing invalid sequences with a warning.
    pub fn decode(&self, script: &Path, stream: &'static str) -> String {
        let bytes = self.to_bytes();
        match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(
                    script = %script.display(),
                    stream,
                    "output is not valid UTF-8; decoding lossily"
                );
                String::from_utf8_lossy(err.as_bytes()).into_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_everything() {
        let buf = CaptureBuffer::new();
        let chunk = vec![b'x'; 64 * 1024];
        for _ in 0..32 {
            buf.push(&chunk);
        }
        assert_eq!(buf.len(), 32 * 64 * 1024);
    }

    #[test]
    fn decodes_invalid_utf8_lossily() {
        let buf = CaptureBuffer::new();
        buf.push(b"ok \xff done");
        let text = buf.decode(Path::new("x.sh"), "stdout");
        assert!(text.starts_with("ok "));
        assert!(text.ends_with(" done"));
        assert!(text.contains('\u{FFFD}'));
    }
}

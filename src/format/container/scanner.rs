use super::MAGIC;
use memchr::memmem;

/// Finds the container marker in a sequence of payloads.
///
/// The number of marker bytes matched at the end of one payload is carried
/// into the next call, so markers split across any number of payloads are
/// still found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MagicScanner {
    matched: usize,
}

impl MagicScanner {
    /// Scanner with no partial match.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker bytes matched at the end of the previous payload.
    pub fn partial_match(&self) -> usize {
        self.matched
    }

    /// Forgets any partial match.
    pub fn reset(&mut self) {
        self.matched = 0;
    }

    /// Scans `payload` and returns the offset just past the marker, if the
    /// marker ends inside it.
    pub fn find(&mut self, payload: &[u8]) -> Option<usize> {
        if payload.len() >= MAGIC.len() {
            if let Some(offset) = memmem::find(payload, &MAGIC) {
                log::debug!("found marker at payload offset {}", offset);
                self.matched = 0;
                return Some(offset + MAGIC.len());
            }
        }

        let mut matched = std::mem::take(&mut self.matched);
        for (index, &byte) in payload.iter().enumerate() {
            if byte == MAGIC[matched] {
                matched += 1;
                if matched == MAGIC.len() {
                    log::debug!("found marker ending at payload offset {}", index + 1);
                    return Some(index + 1);
                }
            } else if byte == MAGIC[0] {
                matched = 1;
            } else {
                matched = 0;
            }
        }

        self.matched = matched;
        None
    }
}

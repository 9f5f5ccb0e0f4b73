//! Marker-delimited frame extraction

use thiserror_no_std::Error;

use super::find;

/// Frame extraction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// The start marker is not in the buffer.
    #[error("start marker not found")]
    StartNotFound,
    /// The end marker does not follow the start marker.
    #[error("end marker not found")]
    EndNotFound,
}

/// Bytes strictly between the first `start` marker and the next `end`
/// marker after it.
///
/// ```
/// use clicks::scan::frame::extract_frame;
///
/// assert_eq!(extract_frame(b"..\x02ABC\x03..", b"\x02", b"\x03"), Ok(&b"ABC"[..]));
/// ```
pub fn extract_frame<'a>(buffer: &'a [u8], start: &[u8], end: &[u8]) -> Result<&'a [u8], FrameError> {
    let begin = find(buffer, start).ok_or(FrameError::StartNotFound)? + start.len();
    let rest = buffer.get(begin..).ok_or(FrameError::EndNotFound)?;
    let len = find(rest, end).ok_or(FrameError::EndNotFound)?;
    rest.get(..len).ok_or(FrameError::EndNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_between_markers() {
        assert_eq!(extract_frame(b"xx<a,b>yy", b"<", b">"), Ok(&b"a,b"[..]));
        assert_eq!(extract_frame(b"[[]]", b"[[", b"]]"), Ok(&b""[..]));
    }

    #[test]
    fn missing_markers() {
        assert_eq!(extract_frame(b"abc>", b"<", b">"), Err(FrameError::StartNotFound));
        assert_eq!(extract_frame(b"<abc", b"<", b">"), Err(FrameError::EndNotFound));
        // end marker before start does not count
        assert_eq!(extract_frame(b">abc<", b"<", b">"), Err(FrameError::EndNotFound));
    }
}

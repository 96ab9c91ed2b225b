use crate::DecodeError;

/// Cursor over a borrowed frame. Slices handed out live as long as the frame.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread tail of the frame, without advancing.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos.min(self.buf.len())..]
    }

    pub fn peek_u8(&self) -> Result<u8, DecodeError> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnexpectedEof)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = self.peek_u8()?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.buf.len())
            .ok_or(DecodeError::UnexpectedEof)?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub fn read_be_u16(&mut self) -> Result<u16, DecodeError> {
        let b = self.read_exact(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_be_u32(&mut self) -> Result<u32, DecodeError> {
        let b = self.read_exact(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::Reader;
    use crate::DecodeError;

    #[test]
    fn reads_are_bounded_by_the_frame() {
        let mut r = Reader::new(&[0xBA, 0xC0, 7]);
        assert_eq!(r.read_be_u16().unwrap(), 0xBAC0);
        assert_eq!(r.rest(), &[7]);
        assert_eq!(r.read_exact(2).unwrap_err(), DecodeError::UnexpectedEof);
        assert_eq!(r.read_u8().unwrap(), 7);
        assert!(r.is_empty());
    }

    #[test]
    fn oversized_length_does_not_overflow() {
        let mut r = Reader::new(&[1, 2]);
        r.read_u8().unwrap();
        assert_eq!(
            r.read_exact(usize::MAX).unwrap_err(),
            DecodeError::UnexpectedEof
        );
    }
}

use crate::errors::DomainError;

/// Bounds-checked cursor over a received datagram.
#[derive(Debug, Clone)]
pub(crate) struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    #[inline]
    pub(crate) const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[inline]
    pub(crate) const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn ensure(&self, what: &str, n: usize) -> Result<(), DomainError> {
        if self.pos + n > self.data.len() {
            return Err(DomainError::truncated(what, self.pos, n, self.data.len()));
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn read_u8(&mut self, what: &str) -> Result<u8, DomainError> {
        self.ensure(what, 1)?;
        let value = self.data[self.pos];
        self.pos += 1;
        Ok(value)
    }

    #[inline]
    pub(crate) fn read_u16(&mut self, what: &str) -> Result<u16, DomainError> {
        self.ensure(what, 2)?;
        let value = u16::from_be_bytes([self.data[self.pos], self.data[self.pos + 1]]);
        self.pos += 2;
        Ok(value)
    }

    #[inline]
    pub(crate) fn read_u32(&mut self, what: &str) -> Result<u32, DomainError> {
        self.ensure(what, 4)?;
        let p = self.pos;
        let value = u32::from_be_bytes([
            self.data[p],
            self.data[p + 1],
            self.data[p + 2],
            self.data[p + 3],
        ]);
        self.pos += 4;
        Ok(value)
    }

    #[inline]
    pub(crate) fn read_bytes(&mut self, what: &str, len: usize) -> Result<&'a [u8], DomainError> {
        self.ensure(what, len)?;
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }
}

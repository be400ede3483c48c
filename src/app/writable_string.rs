use std::io::Write;

/// An implementation of `std::io::Write` based on a `String`.
#[derive(Default)]
pub(crate) struct WritableString(String);

impl Write for WritableString {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let to_add = std::str::from_utf8(buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        self.0.push_str(to_add);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Display for WritableString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

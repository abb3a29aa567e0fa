// fuzz/src/lib.rs
pub mod helpers {
    /// Splits fuzz input into chunks whose sizes come from the input itself.
    pub fn chunks(data: &[u8]) -> Vec<&[u8]> {
        let Some((&seed, mut rest)) = data.split_first() else {
            return Vec::new();
        };
        let size = usize::from(seed % 64) + 1;
        let mut out = Vec::new();
        while !rest.is_empty() {
            let n = size.min(rest.len());
            out.push(&rest[..n]);
            rest = &rest[n..];
        }
        out
    }
}

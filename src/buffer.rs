/// Fixed-capacity ring of mono f32 samples.
///
/// The capture callback writes, the analyzer reads the most recent tail.
/// Once full, new samples overwrite the oldest.
pub struct SampleRing {
    data: Vec<f32>,
    write: usize,
    len: usize,
}

impl SampleRing {
    pub fn new(cap: usize) -> Self {
        Self {
            data: vec![0.0; cap.max(1)],
            write: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, x: f32) {
        let cap = self.data.len();
        self.data[self.write] = x;
        self.write = (self.write + 1) % cap;
        if self.len < cap {
            self.len += 1;
        }
    }

    pub fn extend(&mut self, xs: &[f32]) {
        for &x in xs {
            self.push(x);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copies the `n` most recent samples into `out`, oldest first.
    /// Returns false (leaving `out` untouched) while fewer than `n`
    /// samples have been written.
    pub fn copy_last_n_into(&self, n: usize, out: &mut Vec<f32>) -> bool {
        if n > self.len {
            return false;
        }

        out.clear();
        if n == 0 {
            return true;
        }

        let cap = self.data.len();
        let start = (self.write + cap - n) % cap;

        if start + n <= cap {
            out.extend_from_slice(&self.data[start..start + n]);
        } else {
            out.extend_from_slice(&self.data[start..]);
            out.extend_from_slice(&self.data[..n - (cap - start)]);
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn underfilled_ring_refuses_copy() {
        let mut ring = SampleRing::new(8);
        ring.extend(&[1.0, 2.0, 3.0]);

        let mut out = vec![9.0];
        assert!(!ring.copy_last_n_into(4, &mut out));
        assert_eq!(out, vec![9.0]);

        assert!(ring.copy_last_n_into(3, &mut out));
        assert_eq!(out, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn copy_crosses_the_wrap_point() {
        let mut ring = SampleRing::new(4);
        for x in 0..6 {
            ring.push(x as f32);
        }
        assert_eq!(ring.len(), 4);

        let mut out = Vec::new();
        assert!(ring.copy_last_n_into(4, &mut out));
        assert_eq!(out, vec![2.0, 3.0, 4.0, 5.0]);

        assert!(ring.copy_last_n_into(2, &mut out));
        assert_eq!(out, vec![4.0, 5.0]);
    }

    #[test]
    fn zero_length_copy_is_fine() {
        let ring = SampleRing::new(4);
        assert!(ring.is_empty());

        let mut out = vec![1.0];
        assert!(ring.copy_last_n_into(0, &mut out));
        assert!(out.is_empty());
    }
}

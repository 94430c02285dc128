/// produces `count` evenly spaced values from `start` to `end`, both included:
/// [ lerp(start, end, i / (count - 1)) | i <- 0..count ]
///
/// lerp(a, b, p) = (1 - p) * a + p * b
#[derive(Clone, Debug)]
pub struct Linspace {
    front: usize,
    back: usize,
    count: usize,
    start: f64,
    end: f64,
}

impl Linspace {
    pub fn new(start: f64, end: f64, count: usize) -> Self {
        Linspace {
            front: 0,
            back: count,
            count,
            start,
            end,
        }
    }

    fn at(&self, i: usize) -> f64 {
        if self.count < 2 {
            return self.start;
        }
        let p = i as f64 / (self.count - 1) as f64;
        (1. - p) * self.start + p * self.end
    }
}

impl Iterator for Linspace {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.front >= self.back {
            return None;
        }
        let v = self.at(self.front);
        self.front += 1;
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let l = self.back - self.front;
        (l, Some(l))
    }
}

impl DoubleEndedIterator for Linspace {
    fn next_back(&mut self) -> Option<f64> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.at(self.back))
    }
}

impl ExactSizeIterator for Linspace {}

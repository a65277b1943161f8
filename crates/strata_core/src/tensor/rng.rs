use rand::{rngs::ThreadRng, thread_rng};
use rand_distr::{Distribution, Normal, Uniform};

enum Dist {
    Normal(Normal<f32>),
    Uniform(Uniform<f32>),
}

impl Dist {
    fn new(mean: f32, stdev: f32, use_gaussian: bool) -> Option<Self> {
        const LIMIT: f32 = f32::MAX / 4.0;

        if !mean.is_finite() || !stdev.is_finite() || mean.abs() >= LIMIT || stdev.abs() >= LIMIT {
            return None;
        }

        if use_gaussian {
            Normal::new(mean, stdev).ok().map(Self::Normal)
        } else {
            let spread = stdev.abs();
            Some(Self::Uniform(Uniform::new_inclusive(mean - spread, mean + spread)))
        }
    }

    fn sample(&self, rng: &mut ThreadRng) -> f32 {
        match self {
            Dist::Normal(x) => x.sample(rng),
            Dist::Uniform(x) => x.sample(rng),
        }
    }
}

/// Returns `None` if `mean` and `stdev` do not describe a distribution that
/// can be sampled: non-finite or huge values, or a negative gaussian `stdev`.
pub fn vec_f32(length: usize, mean: f32, stdev: f32, use_gaussian: bool) -> Option<Vec<f32>> {
    let mut rng = thread_rng();
    let dist = Dist::new(mean, stdev, use_gaussian)?;

    Some((0..length).map(|_| dist.sample(&mut rng)).collect())
}

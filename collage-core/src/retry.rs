//! Bounded retry shared by placement (resample a random position) and
//! layout (grow the canvas). The retry policy lives in the closure; this
//! module only counts attempts and stops at the ceiling.

/// Every attempt failed. Carries the error of the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last: E,
}

/// Call `f` with the attempt index `0..max_tries` until it returns `Ok`.
///
/// `max_tries == 0` still runs `f` once so that a caller always gets the
/// error produced by a real attempt.
pub fn attempt<T, E, F>(max_tries: u32, mut f: F) -> Result<T, Exhausted<E>>
where
    F: FnMut(u32) -> Result<T, E>,
{
    let max_tries = max_tries.max(1);
    let mut index = 0;
    loop {
        match f(index) {
            Ok(value) => return Ok(value),
            Err(last) => {
                index += 1;
                if index >= max_tries {
                    return Err(Exhausted {
                        attempts: index,
                        last,
                    });
                }
            }
        }
    }
}

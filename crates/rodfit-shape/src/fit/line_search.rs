//! One-dimensional minimization along a search direction.

const GOLD: f64 = 1.618_033_988_749_895;
const RESP: f64 = 2.0 - GOLD;
const MAX_EXPANSIONS: usize = 50;
const MAX_SECTIONS: usize = 100;

/// Remembers the lowest value seen along the line.
struct Tracker<P> {
    phi: P,
    best_t: f64,
    best_f: f64,
}

impl<P: FnMut(f64) -> Option<f64>> Tracker<P> {
    fn eval(&mut self, t: f64) -> Option<f64> {
        let v = (self.phi)(t)?;
        if v < self.best_f {
            self.best_t = t;
            self.best_f = v;
        }
        Some(v)
    }
}

/// Minimize `phi(t)` starting from `t = 0`, where `phi(0) == f0`.
///
/// `phi` returns `None` once the evaluation budget is spent; the search then
/// stops with what it has. Returns `(t, phi(t))` for the lowest value seen,
/// which is `(0, f0)` unless some `t` gave a strictly lower value.
pub(crate) fn line_minimize<P>(phi: P, f0: f64, tol: f64) -> (f64, f64)
where
    P: FnMut(f64) -> Option<f64>,
{
    let mut tracker = Tracker {
        phi,
        best_t: 0.0,
        best_f: f0,
    };
    // `None` only means the budget ran out.
    let _ = search(&mut tracker, f0, tol);
    (tracker.best_t, tracker.best_f)
}

fn search<P>(tr: &mut Tracker<P>, f0: f64, tol: f64) -> Option<()>
where
    P: FnMut(f64) -> Option<f64>,
{
    // Bracket: walk downhill with golden-ratio growth until the value rises.
    let (mut a, mut b) = (0.0, 1.0);
    let mut fb = tr.eval(b)?;
    if fb > f0 {
        a = 1.0;
        b = 0.0;
        fb = f0;
    }
    let mut c = b + GOLD * (b - a);
    let mut fc = tr.eval(c)?;
    let mut expansions = 0;
    while fc < fb && expansions < MAX_EXPANSIONS {
        a = b;
        b = c;
        fb = fc;
        c = b + GOLD * (b - a);
        fc = tr.eval(c)?;
        expansions += 1;
    }

    // Golden-section refinement inside [a, c].
    let (mut lo, mut hi) = if a < c { (a, c) } else { (c, a) };
    let mut x1 = lo + RESP * (hi - lo);
    let mut x2 = hi - RESP * (hi - lo);
    let mut f1 = tr.eval(x1)?;
    let mut f2 = tr.eval(x2)?;
    let mut sections = 0;
    while sections < MAX_SECTIONS && (hi - lo) > tol * (1.0 + 0.5 * (lo + hi).abs()) {
        if f1 < f2 {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = lo + RESP * (hi - lo);
            f1 = tr.eval(x1)?;
        } else {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = hi - RESP * (hi - lo);
            f2 = tr.eval(x2)?;
        }
        sections += 1;
    }
    Some(())
}

use super::{CoefficientRing, Series};
use std::ops::{Add, Mul, Neg, Sub};

fn add_impl<U: CoefficientRing>(a: &Series<U>, b: &Series<U>) -> Series<U> {
    assert_eq!(a.order(), b.order(), "series of mismatched order cannot be combined");
    let coeffs = a
        .coeffs
        .iter()
        .zip(b.coeffs.iter())
        .map(|(x, y)| x.clone() + y.clone())
        .collect();
    Series { coeffs }
}

fn sub_impl<U: CoefficientRing>(a: &Series<U>, b: &Series<U>) -> Series<U> {
    assert_eq!(a.order(), b.order(), "series of mismatched order cannot be combined");
    let coeffs = a
        .coeffs
        .iter()
        .zip(b.coeffs.iter())
        .map(|(x, y)| x.clone() - y.clone())
        .collect();
    Series { coeffs }
}

/// Cauchy product, truncated at the shared order `N` (both operands already
/// carry exactly `N + 1` coefficients, so no extra truncation step is
/// needed: indices beyond `N` are simply never formed).
fn mul_impl<U: CoefficientRing>(a: &Series<U>, b: &Series<U>) -> Series<U> {
    assert_eq!(a.order(), b.order(), "series of mismatched order cannot be combined");
    let n = a.order();
    let zero = a.coeffs[0].zero_like();
    let mut coeffs = vec![zero; n + 1];
    for k in 0..=n {
        let mut acc = a.coeffs[0].zero_like();
        for i in 0..=k {
            acc = acc + a.coeffs[i].clone() * b.coeffs[k - i].clone();
        }
        coeffs[k] = acc;
    }
    Series { coeffs }
}

fn neg_impl<U: CoefficientRing>(a: &Series<U>) -> Series<U> {
    let coeffs = a.coeffs.iter().map(|c| -c.clone()).collect();
    Series { coeffs }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $imp:path) => {
        impl<U: CoefficientRing> $trait<Series<U>> for Series<U> {
            type Output = Series<U>;
            fn $method(self, rhs: Series<U>) -> Series<U> {
                $imp(&self, &rhs)
            }
        }
        impl<'a, U: CoefficientRing> $trait<&'a Series<U>> for Series<U> {
            type Output = Series<U>;
            fn $method(self, rhs: &'a Series<U>) -> Series<U> {
                $imp(&self, rhs)
            }
        }
        impl<'a, U: CoefficientRing> $trait<Series<U>> for &'a Series<U> {
            type Output = Series<U>;
            fn $method(self, rhs: Series<U>) -> Series<U> {
                $imp(self, &rhs)
            }
        }
        impl<'a, 'b, U: CoefficientRing> $trait<&'b Series<U>> for &'a Series<U> {
            type Output = Series<U>;
            fn $method(self, rhs: &'b Series<U>) -> Series<U> {
                $imp(self, rhs)
            }
        }
    };
}

forward_binop!(Add, add, add_impl);
forward_binop!(Sub, sub, sub_impl);
forward_binop!(Mul, mul, mul_impl);

impl<U: CoefficientRing> Neg for Series<U> {
    type Output = Series<U>;
    fn neg(self) -> Series<U> {
        neg_impl(&self)
    }
}

impl<'a, U: CoefficientRing> Neg for &'a Series<U> {
    type Output = Series<U>;
    fn neg(self) -> Series<U> {
        neg_impl(self)
    }
}

/// Scalar multiplication by a real, used for Horner evaluation and for
/// rescaling a jet in place.
impl<U: CoefficientRing> Mul<U::Real> for Series<U> {
    type Output = Series<U>;
    fn mul(self, rhs: U::Real) -> Series<U> {
        let coeffs = self.coeffs.into_iter().map(|c| c.scale(rhs)).collect();
        Series { coeffs }
    }
}

impl<'a, U: CoefficientRing> Mul<U::Real> for &'a Series<U> {
    type Output = Series<U>;
    fn mul(self, rhs: U::Real) -> Series<U> {
        let coeffs = self.coeffs.iter().map(|c| c.scale(rhs)).collect();
        Series { coeffs }
    }
}

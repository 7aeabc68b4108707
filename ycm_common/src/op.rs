/// Implements the arithmetic operator traits for single-field newtypes.
///
/// ```nocompile
/// op!(binary Points, Add, add);
/// op!(inplace Points, SubAssign, sub_assign);
/// op!(unary Points, Neg, neg);
/// ```
#[macro_export]
macro_rules! op {
    (binary $type:ty, $impl:ident, $method:ident) => {
        impl std::ops::$impl for $type {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self::Output {
                Self(std::ops::$impl::$method(self.0, rhs.0))
            }
        }
    };
    (inplace $type:ty, $impl:ident, $method:ident) => {
        impl std::ops::$impl for $type {
            fn $method(&mut self, rhs: Self) {
                std::ops::$impl::$method(&mut self.0, rhs.0)
            }
        }
    };
    (unary $type:ty, $impl:ident, $method:ident) => {
        impl std::ops::$impl for $type {
            type Output = Self;

            fn $method(self) -> Self::Output {
                Self(std::ops::$impl::$method(self.0))
            }
        }
    };
}

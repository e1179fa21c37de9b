// implements "T op T", "T op &U", and "&T op U" based on
// "&T op &U" where T and U are not `Copy`able
macro_rules! forward_ref_binop {
    (impl $imp:ident, $method:ident for $t:ty, $u:ty) => {
        impl ::core::ops::$imp<$u> for $t {
            type Output = <&'static $t as ::core::ops::$imp<&'static $u>>::Output;

            #[inline]
            fn $method(self, other: $u) -> Self::Output {
                ::core::ops::$imp::$method(&self, &other)
            }
        }

        impl ::core::ops::$imp<&$u> for $t {
            type Output = <&'static $t as ::core::ops::$imp<&'static $u>>::Output;

            #[inline]
            fn $method(self, other: &$u) -> Self::Output {
                ::core::ops::$imp::$method(&self, other)
            }
        }

        impl ::core::ops::$imp<$u> for &$t {
            type Output = <Self as ::core::ops::$imp<&'static $u>>::Output;

            #[inline]
            fn $method(self, other: $u) -> Self::Output {
                ::core::ops::$imp::$method(self, &other)
            }
        }
    };
}
pub(crate) use forward_ref_binop;

// implements the unary operator "op T" based on "op &T" where
// T is not `Copy`able
macro_rules! forward_ref_unop {
    (impl $imp:ident, $method:ident for $t:ty) => {
        impl ::core::ops::$imp for $t {
            type Output = <&'static $t as ::core::ops::$imp>::Output;

            #[inline]
            fn $method(self) -> Self::Output {
                ::core::ops::$imp::$method(&self)
            }
        }
    };
}
pub(crate) use forward_ref_unop;

/// N-ary arithmetic and the analytic quotient.
///
/// Left folds over scalar and vector operands with broadcasting.
pub mod arithmetic;
/// `Power` and `Root`.
///
/// Both round their second operand and always cut the longer operand.
pub mod power;
/// Distance, covariance and correlation of two operands.
pub mod comparison;

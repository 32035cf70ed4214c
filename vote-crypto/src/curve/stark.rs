use super::{BaseField, CurveConfig};
use crate::field::{FieldElement, StarkOrder, StarkPrime};

/// The STARK curve `y^2 = x^3 + x + beta` over the STARK prime field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarkCurve;

impl CurveConfig for StarkCurve {
    type BaseModulus = StarkPrime;
    type ScalarModulus = StarkOrder;

    const ALPHA: BaseField<Self> = FieldElement::ONE;

    const BETA: BaseField<Self> = FieldElement::from_hex_unchecked(
        "06f21413efbe40de150e596d72f7a8c5609ad26c15c915c1f4cdfcb99cee9e89",
    );

    const GENERATOR_X: BaseField<Self> = FieldElement::from_hex_unchecked(
        "01ef15c18599971b7beced415a40f0c7deacfd9b0d1819e03d723d8bc943cfca",
    );

    const GENERATOR_Y: BaseField<Self> = FieldElement::from_hex_unchecked(
        "005668060aa49730b7be4801df46ec62de53ecd11abe43a32873000c36e8dc1f",
    );
}

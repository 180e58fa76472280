//! Distribution registry.
//!
//! A closed set of distribution variants that can be parsed from a tagged
//! JSON object, sampled, and (for the three parametric forms) transformed
//! into new instances:
//!
//! | tag                | variant                          |
//! |--------------------|----------------------------------|
//! | `normal`           | [`NormalDist`]                   |
//! | `lognormal`        | [`LogNormalDist`]                |
//! | `truncated_normal` | [`TruncatedNormalDist`]          |
//! | `function_based`   | [`FunctionBasedDist`]            |
//! | `bernoulli_based`  | [`BernoulliBasedDist`]           |
//!
//! Function- and Bernoulli-based objects may omit the tag; they are
//! recognized by their `mean_function` (and `noise_function`) keys.

mod function;
mod noise;
mod transform;
pub mod truncated;

use rand::Rng;
use rand_distr::{Distribution as _, LogNormal, Normal};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::SampledFields;
use crate::error::{SamplingError, ValidationError};
use crate::value::FieldValue;

pub use function::{FunctionConfig, FunctionInput};
pub use noise::{NoiseFunction, NoiseKind, NoiseParams};
pub use transform::DistributionTransform;

/// Source of numeric inputs for function-evaluated distributions.
pub trait FieldLookup {
    /// Returns the numeric value of `field`.
    fn number(&self, field: &str) -> Result<f64, SamplingError>;
}

/// A bare number reads as the value of every referenced field.
impl FieldLookup for f64 {
    fn number(&self, _field: &str) -> Result<f64, SamplingError> {
        Ok(*self)
    }
}

impl FieldLookup for SampledFields {
    fn number(&self, field: &str) -> Result<f64, SamplingError> {
        let value = self.get(field).ok_or_else(|| SamplingError::MissingField {
            field: field.to_string(),
        })?;
        value.as_number().ok_or_else(|| SamplingError::NonNumericField {
            field: field.to_string(),
            found: value.type_name(),
        })
    }
}

/// One input field or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldRef {
    One(String),
    Many(Vec<String>),
}

impl FieldRef {
    /// Referenced field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let names: &[String] = match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        };
        names.iter().map(String::as_str)
    }

    /// Builds the function input: a scalar for one field, a map for many.
    pub fn input<L: FieldLookup + ?Sized>(&self, inputs: &L) -> Result<FunctionInput, SamplingError> {
        match self {
            Self::One(name) => inputs.number(name).map(FunctionInput::Scalar),
            Self::Many(names) => names
                .iter()
                .map(|name| inputs.number(name).map(|v| (name.clone(), v)))
                .collect::<Result<_, _>>()
                .map(FunctionInput::Fields),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut any = false;
        for name in self.names() {
            any = true;
            if name.trim().is_empty() {
                return Err(invalid("field_name entries must be non-empty"));
            }
        }
        if !any {
            return Err(ValidationError::MissingField {
                field: "field_name".to_string(),
            });
        }
        Ok(())
    }
}

impl From<&str> for FieldRef {
    fn from(v: &str) -> Self {
        Self::One(v.to_string())
    }
}

fn invalid(reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidDistribution {
        reason: reason.into(),
    }
}

fn check_spread(kind: &str, mean: f64, std: f64) -> Result<(), ValidationError> {
    if !mean.is_finite() {
        return Err(invalid(format!("{kind} mean must be finite (got {mean})")));
    }
    if !std.is_finite() || std <= 0.0 {
        return Err(invalid(format!("{kind} std must be finite and > 0 (got {std})")));
    }
    Ok(())
}

fn bad_param(parameter: &'static str, value: f64) -> SamplingError {
    SamplingError::InvalidParameter { parameter, value }
}

/// Gaussian with the given mean and standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalDist {
    pub mean: f64,
    pub std: f64,
}

impl NormalDist {
    fn validate(&self) -> Result<(), ValidationError> {
        check_spread("normal", self.mean, self.std)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, SamplingError> {
        if !self.std.is_finite() || self.std <= 0.0 {
            return Err(bad_param("std", self.std));
        }
        let normal = Normal::new(self.mean, self.std).map_err(|_| bad_param("mean", self.mean))?;
        Ok(normal.sample(rng))
    }
}

/// Log-normal parameterized by the mean and standard deviation of the
/// variable itself (linear space), not of its logarithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogNormalDist {
    pub mean: f64,
    pub std: f64,
}

impl LogNormalDist {
    fn validate(&self) -> Result<(), ValidationError> {
        check_spread("lognormal", self.mean, self.std)?;
        if self.mean <= 0.0 {
            return Err(invalid(format!("lognormal mean must be > 0 (got {})", self.mean)));
        }
        Ok(())
    }

    /// Parameters `(mu, sigma)` of the underlying normal.
    pub fn underlying(&self) -> Result<(f64, f64), SamplingError> {
        if !self.mean.is_finite() || self.mean <= 0.0 {
            return Err(bad_param("lognormal mean", self.mean));
        }
        if !self.std.is_finite() || self.std <= 0.0 {
            return Err(bad_param("lognormal std", self.std));
        }
        let (m2, s2) = (self.mean * self.mean, self.std * self.std);
        let mu = (m2 / (s2 + m2).sqrt()).ln();
        let sigma = (1.0 + s2 / m2).ln().sqrt();
        Ok((mu, sigma))
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, SamplingError> {
        let (mu, sigma) = self.underlying()?;
        let dist = LogNormal::new(mu, sigma).map_err(|_| bad_param("lognormal sigma", sigma))?;
        Ok(dist.sample(rng))
    }
}

fn unbounded() -> f64 {
    f64::INFINITY
}

fn is_unbounded(v: &f64) -> bool {
    *v == f64::INFINITY
}

fn unbounded_below() -> f64 {
    f64::NEG_INFINITY
}

fn is_unbounded_below(v: &f64) -> bool {
    *v == f64::NEG_INFINITY
}

/// Normal restricted to `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruncatedNormalDist {
    pub mean: f64,
    pub std: f64,
    /// JSON has no infinities, so an omitted bound means unbounded.
    #[serde(default = "unbounded_below", skip_serializing_if = "is_unbounded_below")]
    pub lower: f64,
    #[serde(default = "unbounded", skip_serializing_if = "is_unbounded")]
    pub upper: f64,
}

impl TruncatedNormalDist {
    fn validate(&self) -> Result<(), ValidationError> {
        check_spread("truncated_normal", self.mean, self.std)?;
        if self.lower.is_nan() || self.upper.is_nan() || self.lower >= self.upper {
            return Err(invalid(format!(
                "truncated_normal bounds must satisfy lower < upper (got {}, {})",
                self.lower, self.upper
            )));
        }
        Ok(())
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, SamplingError> {
        if !self.std.is_finite() || self.std <= 0.0 {
            return Err(bad_param("std", self.std));
        }
        if !self.mean.is_finite() {
            return Err(bad_param("mean", self.mean));
        }
        if self.lower.is_nan() || self.upper.is_nan() || self.lower >= self.upper {
            return Err(bad_param("lower bound", self.lower));
        }
        Ok(truncated::sample(self.mean, self.std, self.lower, self.upper, rng))
    }
}

/// Mean evaluated from sampled fields, with noise around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionBasedDist {
    pub field_name: FieldRef,
    pub mean_function: FunctionConfig,
    pub noise_function: NoiseFunction,
}

impl FunctionBasedDist {
    fn validate(&self) -> Result<(), ValidationError> {
        self.field_name.validate()?;
        self.mean_function.validate()?;
        self.noise_function.validate()
    }

    fn sample<L, R>(&self, inputs: &L, rng: &mut R) -> Result<f64, SamplingError>
    where
        L: FieldLookup + ?Sized,
        R: Rng + ?Sized,
    {
        let mean = self.mean_function.evaluate(&self.field_name.input(inputs)?)?;
        if !mean.is_finite() {
            return Err(bad_param("mean", mean));
        }
        self.noise_function.apply(mean, inputs, rng)
    }
}

/// Coin flip whose probability is evaluated from sampled fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BernoulliBasedDist {
    pub field_name: FieldRef,
    pub mean_function: FunctionConfig,
}

impl BernoulliBasedDist {
    fn validate(&self) -> Result<(), ValidationError> {
        self.field_name.validate()?;
        self.mean_function.validate()
    }

    /// Success probability, clamped to `[0, 1]`.
    pub fn probability<L: FieldLookup + ?Sized>(&self, inputs: &L) -> Result<f64, SamplingError> {
        let p = self.mean_function.evaluate(&self.field_name.input(inputs)?)?;
        if p.is_nan() {
            return Err(bad_param("probability", p));
        }
        Ok(p.clamp(0.0, 1.0))
    }

    fn sample<L, R>(&self, inputs: &L, rng: &mut R) -> Result<bool, SamplingError>
    where
        L: FieldLookup + ?Sized,
        R: Rng + ?Sized,
    {
        let p = self.probability(inputs)?;
        Ok(rng.gen_bool(p))
    }
}

/// Any supported distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Distribution {
    #[serde(rename = "normal")]
    Normal(NormalDist),
    #[serde(rename = "lognormal")]
    LogNormal(LogNormalDist),
    #[serde(rename = "truncated_normal")]
    TruncatedNormal(TruncatedNormalDist),
    #[serde(rename = "function_based")]
    FunctionBased(FunctionBasedDist),
    #[serde(rename = "bernoulli_based")]
    BernoulliBased(BernoulliBasedDist),
}

fn decode<T: DeserializeOwned>(raw: &serde_json::Value) -> Result<T, ValidationError> {
    T::deserialize(raw).map_err(|e| invalid(e.to_string()))
}

impl Distribution {
    /// Normal distribution shorthand.
    #[must_use]
    pub const fn normal(mean: f64, std: f64) -> Self {
        Self::Normal(NormalDist { mean, std })
    }

    /// Log-normal distribution shorthand (linear-space parameters).
    #[must_use]
    pub const fn lognormal(mean: f64, std: f64) -> Self {
        Self::LogNormal(LogNormalDist { mean, std })
    }

    /// Truncated normal distribution shorthand.
    #[must_use]
    pub const fn truncated_normal(mean: f64, std: f64, lower: f64, upper: f64) -> Self {
        Self::TruncatedNormal(TruncatedNormalDist {
            mean,
            std,
            lower,
            upper,
        })
    }

    /// Parses and validates a raw distribution object.
    ///
    /// # Errors
    ///
    /// Fails on a missing or unknown type tag, on parameters that do not
    /// decode, and on parameters outside their domain.
    pub fn parse(raw: &serde_json::Value) -> Result<Self, ValidationError> {
        let Some(object) = raw.as_object() else {
            return Err(invalid(format!("expected a distribution object, got {raw}")));
        };
        let tag = match object.get("type") {
            Some(serde_json::Value::String(tag)) => tag.as_str(),
            Some(other) => return Err(invalid(format!("type tag must be a string, got {other}"))),
            None if object.contains_key("noise_function") => "function_based",
            None if object.contains_key("mean_function") => "bernoulli_based",
            None => {
                return Err(ValidationError::MissingField {
                    field: "type".to_string(),
                })
            }
        };
        let dist = match tag {
            "normal" => Self::Normal(decode(raw)?),
            "lognormal" => Self::LogNormal(decode(raw)?),
            "truncated_normal" => Self::TruncatedNormal(decode(raw)?),
            "function_based" => Self::FunctionBased(decode(raw)?),
            "bernoulli_based" => Self::BernoulliBased(decode(raw)?),
            other => {
                return Err(ValidationError::UnknownDistribution {
                    tag: other.to_string(),
                })
            }
        };
        dist.validate()?;
        Ok(dist)
    }

    /// Validates parameters of an already-constructed distribution.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Normal(d) => d.validate(),
            Self::LogNormal(d) => d.validate(),
            Self::TruncatedNormal(d) => d.validate(),
            Self::FunctionBased(d) => d.validate(),
            Self::BernoulliBased(d) => d.validate(),
        }
    }

    /// The type tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Normal(_) => "normal",
            Self::LogNormal(_) => "lognormal",
            Self::TruncatedNormal(_) => "truncated_normal",
            Self::FunctionBased(_) => "function_based",
            Self::BernoulliBased(_) => "bernoulli_based",
        }
    }

    /// True for the three parametric forms.
    #[must_use]
    pub const fn is_transformable(&self) -> bool {
        matches!(self, Self::Normal(_) | Self::LogNormal(_) | Self::TruncatedNormal(_))
    }

    /// Returns a new distribution with `mean += mean_shift` and
    /// `std *= std_mult`. `self` is left untouched.
    ///
    /// # Errors
    ///
    /// Function- and Bernoulli-based distributions are not transformable.
    pub fn with_transform(&self, transform: &DistributionTransform) -> Result<Self, SamplingError> {
        let shift = transform.mean_shift_or_default();
        let mult = transform.std_mult_or_default();
        match self {
            Self::Normal(d) => Ok(Self::Normal(NormalDist {
                mean: d.mean + shift,
                std: d.std * mult,
            })),
            Self::LogNormal(d) => Ok(Self::LogNormal(LogNormalDist {
                mean: d.mean + shift,
                std: d.std * mult,
            })),
            Self::TruncatedNormal(d) => Ok(Self::TruncatedNormal(TruncatedNormalDist {
                mean: d.mean + shift,
                std: d.std * mult,
                ..*d
            })),
            Self::FunctionBased(_) | Self::BernoulliBased(_) => Err(SamplingError::Unsupported {
                kind: self.kind(),
                operation: "transforms",
            }),
        }
    }

    /// Draws a number. Bernoulli outcomes read as 1.0 / 0.0.
    ///
    /// `inputs` supplies values for referenced fields; pass `&0.0` when the
    /// distribution references none.
    pub fn sample<L, R>(&self, inputs: &L, rng: &mut R) -> Result<f64, SamplingError>
    where
        L: FieldLookup + ?Sized,
        R: Rng + ?Sized,
    {
        match self {
            Self::Normal(d) => d.sample(rng),
            Self::LogNormal(d) => d.sample(rng),
            Self::TruncatedNormal(d) => d.sample(rng),
            Self::FunctionBased(d) => d.sample(inputs, rng),
            Self::BernoulliBased(d) => d.sample(inputs, rng).map(|hit| if hit { 1.0 } else { 0.0 }),
        }
    }

    /// Draws a field value: a boolean for Bernoulli, a number otherwise.
    pub fn draw<L, R>(&self, inputs: &L, rng: &mut R) -> Result<FieldValue, SamplingError>
    where
        L: FieldLookup + ?Sized,
        R: Rng + ?Sized,
    {
        match self {
            Self::BernoulliBased(d) => d.sample(inputs, rng).map(FieldValue::Bool),
            other => other.sample(inputs, rng).map(FieldValue::Number),
        }
    }
}

impl<'de> Deserialize<'de> for Distribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    fn mean_of(dist: &Distribution, n: usize) -> f64 {
        let mut rng = rng();
        (0..n).map(|_| dist.sample(&0.0, &mut rng).unwrap()).sum::<f64>() / n as f64
    }

    #[test]
    fn parse_dispatches_on_tag() {
        let d = Distribution::parse(&json!({"type": "normal", "mean": 30, "std": 10})).unwrap();
        assert_eq!(d, Distribution::normal(30.0, 10.0));

        let d = Distribution::parse(&json!({"type": "truncated_normal", "mean": 5, "std": 2, "lower": 0})).unwrap();
        assert_eq!(d, Distribution::truncated_normal(5.0, 2.0, 0.0, f64::INFINITY));
    }

    #[test]
    fn parse_rejects_unknown_tag_and_bad_params() {
        assert!(matches!(
            Distribution::parse(&json!({"type": "binomial", "n": 3})),
            Err(ValidationError::UnknownDistribution { .. })
        ));
        assert!(Distribution::parse(&json!({"type": "normal", "mean": 1, "std": 0})).is_err());
        assert!(Distribution::parse(&json!({"type": "normal", "mean": 1, "std": -2})).is_err());
        assert!(Distribution::parse(&json!({"type": "lognormal", "mean": 0, "std": 1})).is_err());
        assert!(Distribution::parse(&json!({
            "type": "truncated_normal", "mean": 1, "std": 1, "lower": 3, "upper": 3
        }))
        .is_err());
        assert!(Distribution::parse(&json!({"type": "normal", "mean": 1})).is_err());
        assert!(Distribution::parse(&json!([1, 2])).is_err());
        assert!(matches!(
            Distribution::parse(&json!({"mean": 1, "std": 2})),
            Err(ValidationError::MissingField { .. })
        ));
    }

    #[test]
    fn parse_recognizes_untagged_function_forms() {
        let fb = Distribution::parse(&json!({
            "field_name": "age",
            "mean_function": {"type": "linear", "params": {"slope": 5, "intercept": 100}},
            "noise_function": {
                "type": "normal",
                "params": {"field_name": "age", "scale_factor": {"type": "linear", "params": {"slope": 0.1, "intercept": 0}}}
            }
        }))
        .unwrap();
        assert_eq!(fb.kind(), "function_based");

        let bern = Distribution::parse(&json!({
            "field_name": "age",
            "mean_function": {"type": "linear", "params": {"slope": 0.02, "intercept": 0.1}}
        }))
        .unwrap();
        assert_eq!(bern.kind(), "bernoulli_based");
    }

    #[test]
    fn reparse_of_serialized_distribution_is_identical() {
        let originals = vec![
            Distribution::normal(-25.0, 0.01),
            Distribution::lognormal(50_000.0, 20_000.0),
            Distribution::truncated_normal(5.0, 2.0, 0.0, f64::INFINITY),
            Distribution::truncated_normal(40.0, 12.0, 18.0, 90.0),
            Distribution::truncated_normal(0.0, 1.0, f64::NEG_INFINITY, 0.0),
            Distribution::truncated_normal(0.0, 1.0, f64::NEG_INFINITY, f64::INFINITY),
        ];
        for original in originals {
            let json = serde_json::to_value(&original).unwrap();
            let reparsed = Distribution::parse(&json).unwrap();
            assert_eq!(original, reparsed);
        }
    }

    #[test]
    fn lognormal_reparameterization_matches_linear_moments() {
        let d = LogNormalDist { mean: 100.0, std: 30.0 };
        let (mu, sigma) = d.underlying().unwrap();
        let mean = (mu + sigma * sigma / 2.0).exp();
        let var = ((sigma * sigma).exp() - 1.0) * (2.0 * mu + sigma * sigma).exp();
        assert!((mean - 100.0).abs() < 1e-9);
        assert!((var.sqrt() - 30.0).abs() < 1e-9);

        let sampled = mean_of(&Distribution::LogNormal(d), 4000);
        assert!((sampled - 100.0).abs() < 3.0);
    }

    #[test]
    fn with_transform_is_pure() {
        let base = Distribution::normal(-25.0, 0.01);
        let shifted = base.with_transform(&DistributionTransform::shift(1000.0)).unwrap();
        assert_eq!(base, Distribution::normal(-25.0, 0.01));
        assert!((mean_of(&shifted, 200) - 975.0).abs() < 0.05);
        assert!((mean_of(&base, 200) + 25.0).abs() < 0.05);
    }

    #[test]
    fn with_transform_scales_spread_and_keeps_bounds() {
        let base = Distribution::truncated_normal(10.0, 2.0, 0.0, 20.0);
        let t = DistributionTransform {
            mean_shift: Some(1.0),
            std_mult: Some(3.0),
        };
        assert_eq!(
            base.with_transform(&t).unwrap(),
            Distribution::truncated_normal(11.0, 6.0, 0.0, 20.0)
        );
    }

    #[test]
    fn function_forms_are_not_transformable() {
        let bern = Distribution::BernoulliBased(BernoulliBasedDist {
            field_name: "age".into(),
            mean_function: FunctionConfig::Constant { value: 0.5 },
        });
        assert!(!bern.is_transformable());
        assert!(matches!(
            bern.with_transform(&DistributionTransform::shift(1.0)),
            Err(SamplingError::Unsupported { .. })
        ));
    }

    #[test]
    fn truncated_samples_stay_in_bounds() {
        let d = Distribution::truncated_normal(0.0, 5.0, -1.0, 2.0);
        let mut rng = rng();
        for _ in 0..1000 {
            let x = d.sample(&0.0, &mut rng).unwrap();
            assert!((-1.0..=2.0).contains(&x));
        }
    }

    #[test]
    fn function_based_reads_referenced_field() {
        let d = Distribution::FunctionBased(FunctionBasedDist {
            field_name: "age".into(),
            mean_function: FunctionConfig::Linear { slope: 5.0, intercept: 100.0 },
            noise_function: NoiseFunction {
                kind: NoiseKind::Normal,
                params: NoiseParams {
                    field_name: "age".to_string(),
                    scale_factor: FunctionConfig::Constant { value: 0.0 },
                    lower: None,
                    upper: None,
                },
            },
        });
        let mut fields = SampledFields::new();
        fields.insert("age".to_string(), FieldValue::Number(20.0));
        assert_eq!(d.sample(&fields, &mut rng()).unwrap(), 200.0);

        // Default input reads every field as zero.
        assert_eq!(d.sample(&0.0, &mut rng()).unwrap(), 100.0);

        let empty = SampledFields::new();
        assert!(matches!(
            d.sample(&empty, &mut rng()),
            Err(SamplingError::MissingField { .. })
        ));

        let mut labels = SampledFields::new();
        labels.insert("age".to_string(), FieldValue::from("old"));
        assert!(matches!(
            d.sample(&labels, &mut rng()),
            Err(SamplingError::NonNumericField { found: "string", .. })
        ));
    }

    #[test]
    fn multi_input_function_needs_field_list() {
        let raw = json!({
            "type": "function_based",
            "field_name": ["age", "skill"],
            "mean_function": {"type": "multi_linear", "params": {"intercept": 1.0, "coefficients": {"age": 2.0, "skill": 3.0}}},
            "noise_function": {"type": "normal", "params": {"field_name": "age", "scale_factor": {"type": "constant", "params": {"value": 0.0}}}}
        });
        let d = Distribution::parse(&raw).unwrap();
        let mut fields = SampledFields::new();
        fields.insert("age".to_string(), FieldValue::Number(10.0));
        fields.insert("skill".to_string(), FieldValue::Number(2.0));
        assert_eq!(d.sample(&fields, &mut rng()).unwrap(), 27.0);

        fields.shift_remove("skill");
        assert!(matches!(
            d.sample(&fields, &mut rng()),
            Err(SamplingError::MissingField { .. })
        ));

        let mut single = raw.clone();
        single["field_name"] = json!("age");
        let d = Distribution::parse(&single).unwrap();
        assert!(matches!(
            d.sample(&10.0, &mut rng()),
            Err(SamplingError::WrongInputShape { .. })
        ));
    }

    #[test]
    fn bernoulli_clamps_probability() {
        let always = Distribution::BernoulliBased(BernoulliBasedDist {
            field_name: "age".into(),
            mean_function: FunctionConfig::Linear { slope: 1.0, intercept: 0.0 },
        });
        let mut rng = rng();
        for _ in 0..100 {
            assert_eq!(always.draw(&5.0, &mut rng).unwrap(), FieldValue::Bool(true));
            assert_eq!(always.draw(&-5.0, &mut rng).unwrap(), FieldValue::Bool(false));
        }
        assert_eq!(always.sample(&2.0, &mut rng).unwrap(), 1.0);
    }
}

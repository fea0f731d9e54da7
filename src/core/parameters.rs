//! Parameter Set - product, host and process inputs of an evaluation
//!
//! A [`ParameterSet`] is a plain value object. Mutation goes through
//! [`ParameterSet::set`] / [`ParameterSet::set_number`], which reject values
//! outside a field's declared domain before they become visible to the cost
//! model. Values are never clamped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::ValidationError;

/// A closed set of labelled choices for an enumerated parameter
pub trait Choice: Copy + Sized + 'static {
    /// Every variant, in display order
    const ALL: &'static [Self];

    /// Display labels, index-aligned with [`Choice::ALL`]
    const LABELS: &'static [&'static str];

    /// Position of this variant in [`Choice::ALL`]
    fn index(self) -> usize;

    /// Human-readable label (e.g. "Monoclonal Antibody")
    fn label(self) -> &'static str {
        Self::LABELS[self.index()]
    }
}

/// Lowercase and drop everything that is not alphanumeric, so that
/// "Monoclonal Antibody", "monoclonal_antibody" and "monoclonal-antibody"
/// compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn parse_choice<T: Choice>(s: &str) -> Option<T> {
    let wanted = normalize(s);
    T::ALL
        .iter()
        .copied()
        .find(|choice| normalize(choice.label()) == wanted)
}

macro_rules! choice_str_impls {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_choice(s).ok_or_else(|| {
                    format!(
                        "Invalid {}: {}. Use one of: {}",
                        $what,
                        s,
                        <$ty as Choice>::LABELS.join(", ")
                    )
                })
            }
        }
    };
}

/// Product type / application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[default]
    MonoclonalAntibody,
    Vaccine,
    Enzyme,
    Hormone,
    GrowthFactor,
}

impl Choice for ProductType {
    const ALL: &'static [Self] = &[
        ProductType::MonoclonalAntibody,
        ProductType::Vaccine,
        ProductType::Enzyme,
        ProductType::Hormone,
        ProductType::GrowthFactor,
    ];
    const LABELS: &'static [&'static str] = &[
        "Monoclonal Antibody",
        "Vaccine",
        "Enzyme",
        "Hormone",
        "Growth Factor",
    ];

    fn index(self) -> usize {
        self as usize
    }
}

choice_str_impls!(ProductType, "product type");

/// Physical state of the final product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateOfMatter {
    Solid,
    #[default]
    Liquid,
    Gas,
}

impl Choice for StateOfMatter {
    const ALL: &'static [Self] = &[StateOfMatter::Solid, StateOfMatter::Liquid, StateOfMatter::Gas];
    const LABELS: &'static [&'static str] = &["Solid", "Liquid", "Gas"];

    fn index(self) -> usize {
        self as usize
    }
}

choice_str_impls!(StateOfMatter, "state of matter");

/// Solubility class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Solubility {
    Low,
    Medium,
    #[default]
    High,
}

impl Choice for Solubility {
    const ALL: &'static [Self] = &[Solubility::Low, Solubility::Medium, Solubility::High];
    const LABELS: &'static [&'static str] = &["Low", "Medium", "High"];

    fn index(self) -> usize {
        self as usize
    }
}

choice_str_impls!(Solubility, "solubility");

/// Where the product accumulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductAccumulation {
    Intracellular,
    #[default]
    Extracellular,
}

impl Choice for ProductAccumulation {
    const ALL: &'static [Self] = &[
        ProductAccumulation::Intracellular,
        ProductAccumulation::Extracellular,
    ];
    const LABELS: &'static [&'static str] = &["Intracellular", "Extracellular"];

    fn index(self) -> usize {
        self as usize
    }
}

choice_str_impls!(ProductAccumulation, "product accumulation");

/// Production organism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MicrobialHost {
    #[default]
    Cho,
    EColi,
    Yeast,
    InsectCells,
    Hek293,
}

impl Choice for MicrobialHost {
    const ALL: &'static [Self] = &[
        MicrobialHost::Cho,
        MicrobialHost::EColi,
        MicrobialHost::Yeast,
        MicrobialHost::InsectCells,
        MicrobialHost::Hek293,
    ];
    const LABELS: &'static [&'static str] = &["CHO", "E. coli", "Yeast", "Insect Cells", "HEK293"];

    fn index(self) -> usize {
        self as usize
    }
}

choice_str_impls!(MicrobialHost, "microbial host");

/// Product concentration method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationMethod {
    #[default]
    Chromatography,
    Distillation,
    Ultrafiltration,
    Precipitation,
}

impl Choice for ConcentrationMethod {
    const ALL: &'static [Self] = &[
        ConcentrationMethod::Chromatography,
        ConcentrationMethod::Distillation,
        ConcentrationMethod::Ultrafiltration,
        ConcentrationMethod::Precipitation,
    ];
    const LABELS: &'static [&'static str] = &[
        "Chromatography",
        "Distillation",
        "Ultrafiltration",
        "Precipitation",
    ];

    fn index(self) -> usize {
        self as usize
    }
}

choice_str_impls!(ConcentrationMethod, "concentration method");

/// Parameter groups, in wizard order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    Product,
    Host,
    Process,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 3] = [FieldGroup::Product, FieldGroup::Host, FieldGroup::Process];

    pub fn title(self) -> &'static str {
        match self {
            FieldGroup::Product => "Product Specifications",
            FieldGroup::Host => "Host Properties",
            FieldGroup::Process => "Process Parameters",
        }
    }
}

/// Allowed range of a numeric parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Strictly greater than zero
    Positive,
    /// Zero or greater
    NonNegative,
    /// 0 to 100 inclusive
    Percent,
    /// Any finite value
    Finite,
}

impl Domain {
    pub fn contains(self, value: f64) -> bool {
        value.is_finite()
            && match self {
                Domain::Positive => value > 0.0,
                Domain::NonNegative => value >= 0.0,
                Domain::Percent => (0.0..=100.0).contains(&value),
                Domain::Finite => true,
            }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Domain::Positive => "greater than 0",
            Domain::NonNegative => "0 or greater",
            Domain::Percent => "between 0 and 100",
            Domain::Finite => "a finite number",
        }
    }
}

/// Value kind of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number(Domain),
    Choice(&'static [&'static str]),
    Flag,
}

/// Static metadata describing one parameter
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: ParameterField,
    pub label: &'static str,
    pub unit: Option<&'static str>,
    pub group: FieldGroup,
    pub kind: FieldKind,
    pub help: &'static str,
}

/// Names of every parameter in a [`ParameterSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterField {
    ProductType,
    MarketValue,
    StateOfMatter,
    Density,
    Titer,
    MolecularWeight,
    BoilingPoint,
    VaporPressure,
    RequiredPurity,
    SpecificHeatCapacity,
    Solubility,
    Crystallizable,
    ProductAccumulation,
    MicrobialHost,
    CellDiameter,
    FacilityWorkingTime,
    FlowRateFromFermentation,
    ElectricityPrice,
    OnsiteStorageTime,
    ProductConcentrationMethod,
}

impl ParameterField {
    pub const ALL: [ParameterField; 20] = [
        ParameterField::ProductType,
        ParameterField::MarketValue,
        ParameterField::StateOfMatter,
        ParameterField::Density,
        ParameterField::Titer,
        ParameterField::MolecularWeight,
        ParameterField::BoilingPoint,
        ParameterField::VaporPressure,
        ParameterField::RequiredPurity,
        ParameterField::SpecificHeatCapacity,
        ParameterField::Solubility,
        ParameterField::Crystallizable,
        ParameterField::ProductAccumulation,
        ParameterField::MicrobialHost,
        ParameterField::CellDiameter,
        ParameterField::FacilityWorkingTime,
        ParameterField::FlowRateFromFermentation,
        ParameterField::ElectricityPrice,
        ParameterField::OnsiteStorageTime,
        ParameterField::ProductConcentrationMethod,
    ];

    /// The camelCase key used on the command line and in reports
    pub fn key(self) -> &'static str {
        match self {
            ParameterField::ProductType => "productType",
            ParameterField::MarketValue => "marketValue",
            ParameterField::StateOfMatter => "stateOfMatter",
            ParameterField::Density => "density",
            ParameterField::Titer => "titer",
            ParameterField::MolecularWeight => "molecularWeight",
            ParameterField::BoilingPoint => "boilingPoint",
            ParameterField::VaporPressure => "vaporPressure",
            ParameterField::RequiredPurity => "requiredPurity",
            ParameterField::SpecificHeatCapacity => "specificHeatCapacity",
            ParameterField::Solubility => "solubility",
            ParameterField::Crystallizable => "crystallizable",
            ParameterField::ProductAccumulation => "productAccumulation",
            ParameterField::MicrobialHost => "microbialHost",
            ParameterField::CellDiameter => "cellDiameter",
            ParameterField::FacilityWorkingTime => "facilityWorkingTime",
            ParameterField::FlowRateFromFermentation => "flowRateFromFermentation",
            ParameterField::ElectricityPrice => "electricityPrice",
            ParameterField::OnsiteStorageTime => "onsiteStorageTime",
            ParameterField::ProductConcentrationMethod => "productConcentrationMethod",
        }
    }

    /// Metadata for this field
    pub fn spec(self) -> FieldSpec {
        use FieldGroup::{Host, Process, Product};
        use FieldKind::{Choice as C, Flag, Number};

        let (label, unit, group, kind, help) = match self {
            ParameterField::ProductType => (
                "Product Type",
                None,
                Product,
                C(ProductType::LABELS),
                "The type of biologic product being produced.",
            ),
            ParameterField::MarketValue => (
                "Market Value",
                Some("$/g"),
                Product,
                Number(Domain::Positive),
                "The estimated market value of the product per gram.",
            ),
            ParameterField::StateOfMatter => (
                "State of Matter",
                None,
                Product,
                C(StateOfMatter::LABELS),
                "The physical state of the final product.",
            ),
            ParameterField::Density => (
                "Density",
                Some("g/cm³"),
                Product,
                Number(Domain::Positive),
                "The mass per unit volume of the product.",
            ),
            ParameterField::Titer => (
                "Titer",
                Some("g/L"),
                Product,
                Number(Domain::Positive),
                "The concentration of the product in the fermentation broth.",
            ),
            ParameterField::MolecularWeight => (
                "Molecular Weight",
                Some("kDa"),
                Product,
                Number(Domain::Positive),
                "The mass of the molecule in kilodaltons.",
            ),
            ParameterField::BoilingPoint => (
                "Boiling Point",
                Some("°C"),
                Product,
                Number(Domain::Finite),
                "The boiling point of the product.",
            ),
            ParameterField::VaporPressure => (
                "Vapor Pressure",
                Some("atm"),
                Product,
                Number(Domain::NonNegative),
                "The vapor pressure of the product.",
            ),
            ParameterField::RequiredPurity => (
                "Required Purity",
                Some("%"),
                Product,
                Number(Domain::Percent),
                "The minimum purity level required for the final product.",
            ),
            ParameterField::SpecificHeatCapacity => (
                "Specific Heat Capacity",
                Some("J/(g·K)"),
                Product,
                Number(Domain::Positive),
                "The heat required to raise one gram of product by one kelvin.",
            ),
            ParameterField::Solubility => (
                "Solubility",
                None,
                Product,
                C(Solubility::LABELS),
                "The ability of the product to dissolve in a solvent.",
            ),
            ParameterField::Crystallizable => (
                "Crystallizable",
                None,
                Product,
                Flag,
                "Whether the product can form crystals.",
            ),
            ParameterField::ProductAccumulation => (
                "Product Accumulation",
                None,
                Product,
                C(ProductAccumulation::LABELS),
                "Whether the product accumulates inside the cell or is secreted.",
            ),
            ParameterField::MicrobialHost => (
                "Microbial Host",
                None,
                Host,
                C(MicrobialHost::LABELS),
                "The organism used to produce the product.",
            ),
            ParameterField::CellDiameter => (
                "Cell Diameter",
                Some("µm"),
                Host,
                Number(Domain::Positive),
                "The average diameter of the cells in micrometers.",
            ),
            ParameterField::FacilityWorkingTime => (
                "Facility Working Time",
                Some("h/yr"),
                Process,
                Number(Domain::Positive),
                "The number of hours the facility operates per year.",
            ),
            ParameterField::FlowRateFromFermentation => (
                "Flow Rate from Fermentation",
                Some("L/h"),
                Process,
                Number(Domain::Positive),
                "The volumetric flow rate of the product stream from the fermentation step.",
            ),
            ParameterField::ElectricityPrice => (
                "Electricity Price",
                Some("$/kWh"),
                Process,
                Number(Domain::NonNegative),
                "The cost of electricity per kilowatt-hour.",
            ),
            ParameterField::OnsiteStorageTime => (
                "Onsite Storage Time",
                Some("days"),
                Process,
                Number(Domain::NonNegative),
                "The number of days the product is stored onsite.",
            ),
            ParameterField::ProductConcentrationMethod => (
                "Product Concentration Method",
                None,
                Process,
                C(ConcentrationMethod::LABELS),
                "The method used to concentrate the product.",
            ),
        };

        FieldSpec {
            field: self,
            label,
            unit,
            group,
            kind,
            help,
        }
    }

    /// Fields belonging to a group, in declaration order
    pub fn in_group(group: FieldGroup) -> impl Iterator<Item = ParameterField> {
        Self::ALL
            .into_iter()
            .filter(move |field| field.spec().group == group)
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ParameterField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        ParameterField::ALL
            .into_iter()
            .find(|field| normalize(field.key()) == wanted)
            .ok_or_else(|| ValidationError::UnknownField(s.to_string()))
    }
}

/// A single parameter value read generically
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Number(f64),
    Choice(&'static str),
    Flag(bool),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Number(n) => write!(f, "{}", n),
            ParameterValue::Choice(label) => f.write_str(label),
            ParameterValue::Flag(true) => f.write_str("yes"),
            ParameterValue::Flag(false) => f.write_str("no"),
        }
    }
}

/// Canonical snapshot of product and process inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    // Product specification
    pub product_type: ProductType,
    pub market_value: f64,
    pub state_of_matter: StateOfMatter,
    pub density: f64,
    pub titer: f64,
    pub molecular_weight: f64,
    pub boiling_point: f64,
    pub vapor_pressure: f64,
    pub required_purity: f64,
    pub specific_heat_capacity: f64,
    pub solubility: Solubility,
    pub crystallizable: bool,
    pub product_accumulation: ProductAccumulation,

    // Host properties
    pub microbial_host: MicrobialHost,
    pub cell_diameter: f64,

    // Process operating parameters
    pub facility_working_time: f64,
    pub flow_rate_from_fermentation: f64,
    pub electricity_price: f64,
    pub onsite_storage_time: f64,
    pub product_concentration_method: ConcentrationMethod,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            product_type: ProductType::MonoclonalAntibody,
            market_value: 500.0,
            state_of_matter: StateOfMatter::Liquid,
            density: 1.03,
            titer: 5.0,
            molecular_weight: 150.0,
            boiling_point: 100.0,
            vapor_pressure: 0.023,
            required_purity: 99.5,
            specific_heat_capacity: 4.18,
            solubility: Solubility::High,
            crystallizable: false,
            product_accumulation: ProductAccumulation::Extracellular,
            microbial_host: MicrobialHost::Cho,
            cell_diameter: 15.0,
            facility_working_time: 7920.0,
            flow_rate_from_fermentation: 1000.0,
            electricity_price: 0.12,
            onsite_storage_time: 30.0,
            product_concentration_method: ConcentrationMethod::Chromatography,
        }
    }
}

fn parse_flag(field: &'static str, raw: &str) -> Result<bool, ValidationError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "on" | "1" => Ok(true),
        "false" | "no" | "n" | "off" | "0" => Ok(false),
        _ => Err(ValidationError::InvalidValue {
            field,
            value: raw.to_string(),
            expected: "true or false".to_string(),
        }),
    }
}

fn parse_enum<T: Choice>(field: &'static str, raw: &str) -> Result<T, ValidationError> {
    parse_choice(raw).ok_or_else(|| ValidationError::InvalidValue {
        field,
        value: raw.to_string(),
        expected: format!("one of: {}", T::LABELS.join(", ")),
    })
}

impl ParameterSet {
    /// Read a field
    pub fn get(&self, field: ParameterField) -> ParameterValue {
        match field {
            ParameterField::ProductType => ParameterValue::Choice(self.product_type.label()),
            ParameterField::StateOfMatter => ParameterValue::Choice(self.state_of_matter.label()),
            ParameterField::Solubility => ParameterValue::Choice(self.solubility.label()),
            ParameterField::Crystallizable => ParameterValue::Flag(self.crystallizable),
            ParameterField::ProductAccumulation => {
                ParameterValue::Choice(self.product_accumulation.label())
            }
            ParameterField::MicrobialHost => ParameterValue::Choice(self.microbial_host.label()),
            ParameterField::ProductConcentrationMethod => {
                ParameterValue::Choice(self.product_concentration_method.label())
            }
            ParameterField::MarketValue
            | ParameterField::Density
            | ParameterField::Titer
            | ParameterField::MolecularWeight
            | ParameterField::BoilingPoint
            | ParameterField::VaporPressure
            | ParameterField::RequiredPurity
            | ParameterField::SpecificHeatCapacity
            | ParameterField::CellDiameter
            | ParameterField::FacilityWorkingTime
            | ParameterField::FlowRateFromFermentation
            | ParameterField::ElectricityPrice
            | ParameterField::OnsiteStorageTime => {
                ParameterValue::Number(self.number(field).unwrap_or_default())
            }
        }
    }

    /// Read a numeric field, `None` for choice and flag fields
    pub fn number(&self, field: ParameterField) -> Option<f64> {
        let value = match field {
            ParameterField::MarketValue => self.market_value,
            ParameterField::Density => self.density,
            ParameterField::Titer => self.titer,
            ParameterField::MolecularWeight => self.molecular_weight,
            ParameterField::BoilingPoint => self.boiling_point,
            ParameterField::VaporPressure => self.vapor_pressure,
            ParameterField::RequiredPurity => self.required_purity,
            ParameterField::SpecificHeatCapacity => self.specific_heat_capacity,
            ParameterField::CellDiameter => self.cell_diameter,
            ParameterField::FacilityWorkingTime => self.facility_working_time,
            ParameterField::FlowRateFromFermentation => self.flow_rate_from_fermentation,
            ParameterField::ElectricityPrice => self.electricity_price,
            ParameterField::OnsiteStorageTime => self.onsite_storage_time,
            _ => return None,
        };
        Some(value)
    }

    fn number_mut(&mut self, field: ParameterField) -> Option<&mut f64> {
        let slot = match field {
            ParameterField::MarketValue => &mut self.market_value,
            ParameterField::Density => &mut self.density,
            ParameterField::Titer => &mut self.titer,
            ParameterField::MolecularWeight => &mut self.molecular_weight,
            ParameterField::BoilingPoint => &mut self.boiling_point,
            ParameterField::VaporPressure => &mut self.vapor_pressure,
            ParameterField::RequiredPurity => &mut self.required_purity,
            ParameterField::SpecificHeatCapacity => &mut self.specific_heat_capacity,
            ParameterField::CellDiameter => &mut self.cell_diameter,
            ParameterField::FacilityWorkingTime => &mut self.facility_working_time,
            ParameterField::FlowRateFromFermentation => &mut self.flow_rate_from_fermentation,
            ParameterField::ElectricityPrice => &mut self.electricity_price,
            ParameterField::OnsiteStorageTime => &mut self.onsite_storage_time,
            _ => return None,
        };
        Some(slot)
    }

    /// Set a numeric field. The set is unchanged if the value is rejected.
    pub fn set_number(&mut self, field: ParameterField, value: f64) -> Result<(), ValidationError> {
        let key = field.key();
        let FieldKind::Number(domain) = field.spec().kind else {
            return Err(ValidationError::NotNumeric { field: key });
        };
        check_number(key, domain, value)?;
        if let Some(slot) = self.number_mut(field) {
            *slot = value;
        }
        Ok(())
    }

    /// Parse and set any field from its textual form
    pub fn set(&mut self, field: ParameterField, raw: &str) -> Result<(), ValidationError> {
        let key = field.key();
        match field {
            ParameterField::ProductType => self.product_type = parse_enum(key, raw)?,
            ParameterField::StateOfMatter => self.state_of_matter = parse_enum(key, raw)?,
            ParameterField::Solubility => self.solubility = parse_enum(key, raw)?,
            ParameterField::Crystallizable => self.crystallizable = parse_flag(key, raw)?,
            ParameterField::ProductAccumulation => {
                self.product_accumulation = parse_enum(key, raw)?
            }
            ParameterField::MicrobialHost => self.microbial_host = parse_enum(key, raw)?,
            ParameterField::ProductConcentrationMethod => {
                self.product_concentration_method = parse_enum(key, raw)?
            }
            _ => {
                let value: f64 =
                    raw.trim()
                        .parse()
                        .map_err(|_| ValidationError::InvalidValue {
                            field: key,
                            value: raw.to_string(),
                            expected: "a number".to_string(),
                        })?;
                self.set_number(field, value)?;
            }
        }
        Ok(())
    }

    /// Apply several assignments atomically: either all succeed or the set
    /// is left untouched.
    pub fn apply<'a, I>(&mut self, assignments: I) -> Result<(), ValidationError>
    where
        I: IntoIterator<Item = (ParameterField, &'a str)>,
    {
        let mut next = self.clone();
        for (field, raw) in assignments {
            next.set(field, raw)?;
        }
        *self = next;
        Ok(())
    }

    /// Check every numeric field against its domain
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in ParameterField::ALL {
            if let (Some(value), FieldKind::Number(domain)) = (self.number(field), field.spec().kind)
            {
                check_number(field.key(), domain, value)?;
            }
        }
        Ok(())
    }
}

fn check_number(field: &'static str, domain: Domain, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if !domain.contains(value) {
        return Err(ValidationError::OutOfDomain {
            field,
            domain: domain.describe(),
            value,
        });
    }
    Ok(())
}

//! Feature Definitions
//! The eight predictor columns, the outcome column, and how each predictor is
//! entered in the input form.

/// Name of the binary label column.
pub const OUTCOME_COLUMN: &str = "Outcome";

/// Number of predictor columns.
pub const FEATURE_COUNT: usize = 8;

/// Predictor columns in model order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

/// Form widget used to enter a feature value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputKind {
    /// Horizontal slider with a live value label.
    Slider,
    /// Rotary control with a live value label.
    Dial,
    /// Integer spin box.
    SpinBox,
    /// Decimal spin box with a fixed number of decimals.
    DoubleSpinBox { decimals: usize },
}

/// Widget kind and range for one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSpec {
    pub kind: InputKind,
    pub min: f64,
    pub max: f64,
}

impl InputSpec {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn is_integer(&self) -> bool {
        !matches!(self.kind, InputKind::DoubleSpinBox { .. })
    }

    pub fn shows_value_label(&self) -> bool {
        matches!(self.kind, InputKind::Slider | InputKind::Dial)
    }
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Pregnancies,
        Feature::Glucose,
        Feature::BloodPressure,
        Feature::SkinThickness,
        Feature::Insulin,
        Feature::Bmi,
        Feature::DiabetesPedigreeFunction,
        Feature::Age,
    ];

    /// Column header in the dataset.
    pub fn column_name(self) -> &'static str {
        match self {
            Feature::Pregnancies => "Pregnancies",
            Feature::Glucose => "Glucose",
            Feature::BloodPressure => "Blood_Pressure",
            Feature::SkinThickness => "Skin_Thickness",
            Feature::Insulin => "Insulin",
            Feature::Bmi => "BMI",
            Feature::DiabetesPedigreeFunction => "Diabetes_Pedigree_Function",
            Feature::Age => "Age",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn input_spec(self) -> InputSpec {
        let (kind, min, max) = match self {
            Feature::Pregnancies => (InputKind::Slider, 0.0, 20.0),
            Feature::Glucose => (InputKind::SpinBox, 60.0, 200.0),
            Feature::BloodPressure => (InputKind::SpinBox, 0.0, 150.0),
            Feature::SkinThickness => (InputKind::Dial, 10.0, 50.0),
            Feature::Insulin => (InputKind::SpinBox, 0.0, 999.0),
            Feature::Bmi => (InputKind::DoubleSpinBox { decimals: 2 }, 0.0, 60.0),
            Feature::DiabetesPedigreeFunction => {
                (InputKind::DoubleSpinBox { decimals: 3 }, 0.0, 3.0)
            }
            Feature::Age => (InputKind::Slider, 10.0, 99.0),
        };
        InputSpec { kind, min, max }
    }
}

/// One patient row as entered in the form, in model order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureInput {
    values: [f64; FEATURE_COUNT],
}

impl Default for FeatureInput {
    /// Every widget starts at its minimum.
    fn default() -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for feature in Feature::ALL {
            values[feature.index()] = feature.input_spec().min;
        }
        Self { values }
    }
}

impl FeatureInput {
    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// Set a value, clamped to the widget range. Integer widgets round.
    pub fn set(&mut self, feature: Feature, value: f64) {
        let spec = feature.input_spec();
        let value = spec.clamp(value);
        self.values[feature.index()] = if spec.is_integer() {
            value.round()
        } else {
            value
        };
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

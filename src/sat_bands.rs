use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Satellites {
    Sentinel2,
    Sentinel3,
}

#[derive(Debug)]
pub struct SatBands {
    sensor: Satellites,
    names: &'static [&'static str],
}

impl SatBands {
    pub fn new(sensor: Satellites) -> Self {
        let names: &'static [&'static str] = match sensor {
            // MSI bands 1 to 12, with 8A between 8 and 9
            Satellites::Sentinel2 => &[
                "B1", "B2", "B3", "B4", "B5", "B6", "B7", "B8", "B8A", "B9", "B10", "B11", "B12",
            ],
            // OLCI bands Oa01 to Oa21
            Satellites::Sentinel3 => &[
                "Oa01", "Oa02", "Oa03", "Oa04", "Oa05", "Oa06", "Oa07", "Oa08", "Oa09", "Oa10",
                "Oa11", "Oa12", "Oa13", "Oa14", "Oa15", "Oa16", "Oa17", "Oa18", "Oa19", "Oa20",
                "Oa21",
            ],
        };
        Self { sensor, names }
    }

    pub fn sensor(&self) -> Satellites {
        self.sensor
    }

    /// Number of bands the feature layout reserves for this sensor.
    pub fn nominal_len(&self) -> usize {
        self.names.len()
    }

    /// Truncates or right-pads `values` with 0.0 to the nominal band count.
    /// Returns the adjusted bands and whether an adjustment was needed.
    pub fn fit(&self, values: &[f64]) -> (Vec<f64>, bool) {
        let n = self.nominal_len();
        let mut fitted: Vec<f64> = values.iter().copied().take(n).collect();
        fitted.resize(n, 0.0);
        (fitted, values.len() != n)
    }
}

impl Display for Satellites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Satellites::Sentinel2 => write!(f, "Sentinel-2 MSI"),
            Satellites::Sentinel3 => write!(f, "Sentinel-3 OLCI"),
        }
    }
}

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const STATION_COUNT: usize = 250;
const STATION_SPACING_M: f64 = 20.0;
const SURVEY_YEAR: i64 = 2024;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

struct SurveyRow {
    stationing: f64,
    depth_mm: f64,
    off_psp: f64,
    soil_resistivity: f64,
    distance_km: f64,
    operating_pressure: f64,
    remaining_thickness: f64,
    hoop_stress_pct: f64,
    coating: &'static str,
    constr_year: i64,
    temperature: f64,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<SurveyRow> {
    let mut rows = Vec::with_capacity(STATION_COUNT);
    for i in 0..STATION_COUNT {
        let stationing = i as f64 * STATION_SPACING_M;

        // Cathodic protection drifts along the line and dips under the
        // 0.85 V criterion in one stretch so the threshold lines matter.
        let drift = 0.18 * (stationing / 900.0).sin();
        let mut magnitude = 1.05 + drift + rng.gauss(0.0, 0.04);
        if (2600.0..3100.0).contains(&stationing) {
            magnitude -= 0.30;
        }
        let off_psp = -magnitude.clamp(0.55, 1.45);

        let (coating, constr_year) = if stationing < 1600.0 {
            ("Coal Tar", 1987)
        } else if stationing < 3400.0 {
            ("3LPE", 1996)
        } else {
            ("FBE", 2008)
        };

        let remaining_thickness =
            (7.1 - stationing * 0.00008 + rng.gauss(0.0, 0.12)).clamp(4.0, 7.4);
        let operating_pressure = 54.0 - stationing * 0.0004 + rng.gauss(0.0, 0.9);
        // Thinner wall carries more of the yield stress; older segments run
        // hotter than the 60% SMYS limit in places.
        let hoop_stress_pct =
            (46.0 + (7.1 - remaining_thickness) * 9.0 + rng.gauss(0.0, 4.5)).clamp(22.0, 82.0);

        rows.push(SurveyRow {
            stationing,
            depth_mm: round_to(rng.gauss(1200.0, 90.0).max(600.0), 1),
            off_psp: round_to(off_psp, 3),
            soil_resistivity: round_to(rng.gauss(8.3, 0.45).exp(), 0),
            distance_km: round_to(stationing / 1000.0 + 2.5, 3),
            operating_pressure: round_to(operating_pressure, 2),
            remaining_thickness: round_to(remaining_thickness, 2),
            hoop_stress_pct: round_to(hoop_stress_pct, 1),
            coating,
            constr_year,
            temperature: round_to(rng.gauss(29.0, 2.5), 1),
        });
    }
    rows
}

/// CSV export the way field contractors deliver it: padded headers and
/// hoop stress as "NN.N%" strings.
fn write_csv(rows: &[SurveyRow], path: &str) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;

    writer.write_record([
        "Stationing (m) ",
        "Depth (mm)",
        " OFF PSP (VE V)",
        "Soil Resistivity (Ω-cm)",
        "Distance from Pump(KM)",
        "Operating Pr.",
        "Remaining Thickness(mm)",
        "Hoop stress% of SMYS",
        "CoatingType",
        "nmConstrYear",
        "Pipe Age",
        "Temperature",
    ])?;

    for row in rows {
        writer.write_record([
            format!("{:.1}", row.stationing),
            format!("{:.1}", row.depth_mm),
            format!("{:.3}", row.off_psp),
            format!("{:.0}", row.soil_resistivity),
            format!("{:.3}", row.distance_km),
            format!("{:.2}", row.operating_pressure),
            format!("{:.2}", row.remaining_thickness),
            format!("{:.1}%", row.hoop_stress_pct),
            row.coating.to_string(),
            row.constr_year.to_string(),
            (SURVEY_YEAR - row.constr_year).to_string(),
            format!("{:.1}", row.temperature),
        ])?;
    }

    writer.flush().with_context(|| format!("writing {path}"))?;
    Ok(())
}

/// Parquet export with clean headers and hoop stress as a 0..1 fraction.
fn write_parquet(rows: &[SurveyRow], path: &str) -> Result<()> {
    let stationing = Float64Array::from(rows.iter().map(|r| r.stationing).collect::<Vec<_>>());
    let depth = Float64Array::from(rows.iter().map(|r| r.depth_mm).collect::<Vec<_>>());
    let off_psp = Float64Array::from(rows.iter().map(|r| r.off_psp).collect::<Vec<_>>());
    let soil =
        Float64Array::from(rows.iter().map(|r| r.soil_resistivity).collect::<Vec<_>>());
    let distance = Float64Array::from(rows.iter().map(|r| r.distance_km).collect::<Vec<_>>());
    let pressure =
        Float64Array::from(rows.iter().map(|r| r.operating_pressure).collect::<Vec<_>>());
    let thickness =
        Float64Array::from(rows.iter().map(|r| r.remaining_thickness).collect::<Vec<_>>());
    let stress = Float64Array::from(
        rows.iter()
            .map(|r| round_to(r.hoop_stress_pct / 100.0, 3))
            .collect::<Vec<_>>(),
    );
    let coating = StringArray::from(rows.iter().map(|r| r.coating).collect::<Vec<_>>());
    let year = Int64Array::from(rows.iter().map(|r| r.constr_year).collect::<Vec<_>>());
    let age = Int64Array::from(
        rows.iter()
            .map(|r| SURVEY_YEAR - r.constr_year)
            .collect::<Vec<_>>(),
    );
    let temperature =
        Float64Array::from(rows.iter().map(|r| r.temperature).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("Stationing (m)", DataType::Float64, false),
        Field::new("Depth (mm)", DataType::Float64, false),
        Field::new("OFF PSP (VE V)", DataType::Float64, false),
        Field::new("Soil Resistivity (Ω-cm)", DataType::Float64, false),
        Field::new("Distance from Pump(KM)", DataType::Float64, false),
        Field::new("Operating Pr.", DataType::Float64, false),
        Field::new("Remaining Thickness(mm)", DataType::Float64, false),
        Field::new("Hoop stress% of SMYS", DataType::Float64, false),
        Field::new("CoatingType", DataType::Utf8, false),
        Field::new("nmConstrYear", DataType::Int64, false),
        Field::new("Pipe Age", DataType::Int64, false),
        Field::new("Temperature", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(stationing),
            Arc::new(depth),
            Arc::new(off_psp),
            Arc::new(soil),
            Arc::new(distance),
            Arc::new(pressure),
            Arc::new(thickness),
            Arc::new(stress),
            Arc::new(coating),
            Arc::new(year),
            Arc::new(age),
            Arc::new(temperature),
        ],
    )?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows, "survey_data.csv")?;
    write_parquet(&rows, "survey_data.parquet")?;

    println!(
        "Wrote {} stations ({:.1} m spacing) to survey_data.csv and survey_data.parquet",
        rows.len(),
        STATION_SPACING_M
    );
    Ok(())
}

//! CSV frame source: `t,ax,ay,az,gx,gy,gz`, strict header enforcement
//! mirroring `doser_config::load_calibration_csv`.

use pinch_core::SensorFrame;
use pinch_traits::{FrameSource, FrameSourceError};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FrameRow {
    t: f64,
    ax: f32,
    ay: f32,
    az: f32,
    gx: f32,
    gy: f32,
    gz: f32,
}

impl From<FrameRow> for SensorFrame {
    fn from(r: FrameRow) -> Self {
        SensorFrame {
            t: r.t,
            ax: r.ax,
            ay: r.ay,
            az: r.az,
            gx: r.gx,
            gy: r.gy,
            gz: r.gz,
        }
    }
}

pub struct CsvFrameSource {
    rows: std::vec::IntoIter<SensorFrame>,
}

impl CsvFrameSource {
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| eyre::eyre!("open frame CSV {:?}: {}", path, e))?;

        let headers = rdr
            .headers()
            .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
            .clone();
        let expected = ["t", "ax", "ay", "az", "gx", "gy", "gz"];
        let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        if actual != expected {
            eyre::bail!(
                "frame CSV must have headers 't,ax,ay,az,gx,gy,gz', got: {}",
                actual.join(",")
            );
        }

        let mut rows = Vec::new();
        for (idx, rec) in rdr.deserialize::<FrameRow>().enumerate() {
            let row = rec.map_err(|e| eyre::eyre!("invalid CSV row {}: {}", idx + 2, e))?;
            rows.push(SensorFrame::from(row));
        }
        Ok(Self {
            rows: rows.into_iter(),
        })
    }
}

impl FrameSource for CsvFrameSource {
    fn next(&mut self) -> Result<Option<SensorFrame>, FrameSourceError> {
        Ok(self.rows.next())
    }
}

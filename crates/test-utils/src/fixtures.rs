//! Product and footprint fixtures.

use std::path::{Path, PathBuf};

use projection::{GeoTransform, SpatialRef};
use radar_common::{GridShape, MaskedGrid, ProductDataset, ProductError, ProductResult};

/// A fully in-memory product, for exercising checks without a container.
#[derive(Debug, Clone)]
pub struct InMemoryProduct {
    pub name: PathBuf,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub lat: MaskedGrid,
    pub lon: MaskedGrid,
    pub time_units: String,
    pub time_offsets: Vec<i64>,
    pub frames: Vec<MaskedGrid>,
}

impl ProductDataset for InMemoryProduct {
    fn path(&self) -> &Path {
        &self.name
    }

    fn x_coords(&self) -> ProductResult<Vec<f64>> {
        Ok(self.x.clone())
    }

    fn y_coords(&self) -> ProductResult<Vec<f64>> {
        Ok(self.y.clone())
    }

    fn latitudes(&self) -> ProductResult<MaskedGrid> {
        Ok(self.lat.clone())
    }

    fn longitudes(&self) -> ProductResult<MaskedGrid> {
        Ok(self.lon.clone())
    }

    fn time_units(&self) -> ProductResult<String> {
        Ok(self.time_units.clone())
    }

    fn time_offsets(&self) -> ProductResult<Vec<i64>> {
        Ok(self.time_offsets.clone())
    }

    fn frame_count(&self) -> ProductResult<usize> {
        Ok(self.frames.len())
    }

    fn rainfall_frame(&self, index: usize) -> ProductResult<MaskedGrid> {
        self.frames
            .get(index)
            .cloned()
            .ok_or_else(|| ProductError::Read {
                variable: "rainfall_rate".to_string(),
                reason: format!("frame {} out of range ({})", index, self.frames.len()),
            })
    }
}

/// Grid geometry shared by a footprint and the products built from it.
#[derive(Debug, Clone)]
pub struct GridFixture {
    pub rows: usize,
    pub cols: usize,
    pub srs: SpatialRef,
    pub transform: GeoTransform,
}

impl GridFixture {
    /// A small UTM zone 32N grid with 1 km cells (Sardinia-like extent).
    pub fn utm32(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            srs: SpatialRef::UtmWgs84 {
                zone: 32,
                north: true,
            },
            transform: GeoTransform::from_gdal([
                500_000.0,
                1000.0,
                0.0,
                4_350_000.0,
                0.0,
                -1000.0,
            ])
            .expect("fixture transform is axis-aligned"),
        }
    }

    pub fn shape(&self) -> GridShape {
        GridShape::new(self.rows, self.cols)
    }

    /// Cell-center x coordinates, one per column.
    pub fn xpos(&self) -> Vec<f64> {
        (0..self.cols)
            .map(|j| self.transform.apply(j as f64 + 0.5, 0.0).0)
            .collect()
    }

    /// Cell-center y coordinates, one per row.
    pub fn ypos(&self) -> Vec<f64> {
        (0..self.rows)
            .map(|i| self.transform.apply(0.0, i as f64 + 0.5).1)
            .collect()
    }

    /// Per-cell geographic coordinates derived through the projection crate.
    pub fn latlon(&self) -> (MaskedGrid, MaskedGrid) {
        let shape = self.shape();
        let xpos = self.xpos();
        let ypos = self.ypos();
        let mut lat = Vec::with_capacity(shape.len());
        let mut lon = Vec::with_capacity(shape.len());
        for &y in &ypos {
            for &x in &xpos {
                let (la, lo) = projection::to_geographic(self.srs, x, y);
                lat.push(la);
                lon.push(lo);
            }
        }
        let lat = MaskedGrid::new(shape, lat).expect("lat grid sized to shape");
        let lon = MaskedGrid::new(shape, lon).expect("lon grid sized to shape");
        (lat, lon)
    }

    /// Assemble a product whose coordinates are consistent with this grid.
    pub fn product(
        &self,
        epoch: &str,
        time_offsets: &[i64],
        frames: Vec<MaskedGrid>,
    ) -> InMemoryProduct {
        let (lat, lon) = self.latlon();
        InMemoryProduct {
            name: PathBuf::from("in-memory.nc"),
            x: self.xpos(),
            y: self.ypos(),
            lat,
            lon,
            time_units: format!("seconds since {}", epoch),
            time_offsets: time_offsets.to_vec(),
            frames,
        }
    }

    /// The YAML descriptor text for this grid's footprint.
    pub fn footprint_yaml(&self) -> String {
        format!(
            "rows: {}\ncols: {}\nsrs: \"{}\"\ntransform: [{}, {}, 0.0, {}, 0.0, {}]\n",
            self.rows,
            self.cols,
            self.srs,
            self.transform.origin_x,
            self.transform.pixel_width,
            self.transform.origin_y,
            self.transform.pixel_height,
        )
    }
}

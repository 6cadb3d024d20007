use std::path::Path;

use anyhow::{anyhow, Context};

use crate::film::Film;
use crate::Float;

/// Writes `film` to `path`, choosing the format from the extension. `.exr` keeps the
/// linear float values; every format the `image` crate knows is gamma encoded to 8 bits.
pub fn write_image(path: impl AsRef<Path>, film: &Film) -> anyhow::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| anyhow!("output path {} has no file extension", path.display()))?;

    if ext == "exr" {
        return write_exr(path, film);
    }

    let format = image::ImageFormat::from_extension(&ext)
        .ok_or_else(|| anyhow!("unsupported image extension `.{}`", ext))?;
    film_to_rgb8(film)
        .save_with_format(path, format)
        .with_context(|| format!("failed to write {}", path.display()))
}

pub fn write_exr(path: &Path, film: &Film) -> anyhow::Result<()> {
    let (w, h) = film.dimensions();
    exr::prelude::write_rgb_file(path, w, h, |x, y| {
        let p = film.get(x, y);
        (p[0] as f32, p[1] as f32, p[2] as f32)
    })
    .with_context(|| format!("failed to write {}", path.display()))
}

pub fn film_to_rgb8(film: &Film) -> image::RgbImage {
    let (w, h) = film.dimensions();
    image::RgbImage::from_fn(w as u32, h as u32, |x, y| {
        let p = film.get(x as usize, y as usize);
        image::Rgb([to_byte(p[0]), to_byte(p[1]), to_byte(p[2])])
    })
}

fn to_byte(v: Float) -> u8 {
    // NaN clamps to 0
    (gamma_correct(v.max(0.0)).min(1.0) * 255.0 + 0.5) as u8
}

/// Linear to sRGB transfer curve.
pub fn gamma_correct(v: Float) -> Float {
    if v <= 0.0031308 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gamma_endpoints() {
        assert_eq!(gamma_correct(0.0), 0.0);
        assert_relative_eq!(gamma_correct(1.0), 1.0, epsilon = 1e-12);
        assert!(gamma_correct(0.5) > 0.5);
    }

    #[test]
    fn test_to_byte_clamps() {
        assert_eq!(to_byte(-1.0), 0);
        assert_eq!(to_byte(Float::NAN), 0);
        assert_eq!(to_byte(10.0), 255);
        assert_eq!(to_byte(1.0), 255);
    }

    #[test]
    fn test_unknown_extension_is_error() {
        let film = Film::new(1, 1);
        let dir = std::env::temp_dir();
        assert!(write_image(dir.join("drt_out.nope"), &film).is_err());
        assert!(write_image(dir.join("drt_out"), &film).is_err());
    }

    #[test]
    fn test_write_png_and_exr() {
        let mut film = Film::new(3, 2);
        film.set(2, 1, vec3!(1, 0.5, 0.25));
        let dir = std::env::temp_dir();
        let png = dir.join(format!("drt_test_{}.png", std::process::id()));
        let exr = dir.join(format!("drt_test_{}.exr", std::process::id()));
        write_image(&png, &film).unwrap();
        write_image(&exr, &film).unwrap();
        assert!(png.metadata().unwrap().len() > 0);
        assert!(exr.metadata().unwrap().len() > 0);
        let _ = std::fs::remove_file(png);
        let _ = std::fs::remove_file(exr);
    }
}

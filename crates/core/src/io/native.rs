//! Native GeoTIFF reading/writing (without GDAL dependency)
//!
//! Uses the `tiff` crate for TIFF I/O and reads the GeoTIFF tags needed to
//! place a raster on a map: ModelPixelScale/ModelTiepoint or
//! ModelTransformation, GeoKeyDirectory (EPSG code) and GDAL_NODATA.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{BandSet, GeoTransform, Raster, RasterElement};
use std::io::Cursor;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{Gray32Float, RGB32Float, RGBA32Float};
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: Tag = Tag::ModelPixelScaleTag;
const MODEL_TIEPOINT: Tag = Tag::ModelTiepointTag;
const MODEL_TRANSFORMATION: Tag = Tag::ModelTransformationTag;
const GEO_KEY_DIRECTORY: Tag = Tag::GeoKeyDirectoryTag;
const GDAL_NODATA: Tag = Tag::GdalNodata;

/// Options for writing GeoTIFF buffers
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    /// EPSG code written to the GeoKeyDirectory
    pub epsg: Option<u16>,
    /// Value written to the GDAL_NODATA tag
    pub nodata: Option<f64>,
}

/// Read all bands of an in-memory GeoTIFF.
///
/// Pixel-interleaved and band-sequential layouts are both accepted. Samples
/// are cast to `T`; values that do not fit become `T::default_nodata()`.
pub fn read_bands_from_buffer<T>(data: &[u8]) -> Result<BandSet<T>>
where
    T: RasterElement,
{
    decode_bands(Cursor::new(data))
}

/// Read a single band of an in-memory GeoTIFF (band 0 when `band` is `None`).
pub fn read_geotiff_from_buffer<T>(data: &[u8], band: Option<usize>) -> Result<Raster<T>>
where
    T: RasterElement,
{
    let index = band.unwrap_or(0);
    let bands = read_bands_from_buffer::<T>(data)?;
    let count = bands.len();
    bands
        .band(index)
        .cloned()
        .ok_or(Error::MissingBand { index, count })
}

macro_rules! cast_all {
    ($buf:expr) => {
        $buf.iter().map(|&v| T::from_f64(v as f64)).collect::<Vec<T>>()
    };
}

/// Internal: decode a GeoTIFF from any `Read + Seek` source
fn decode_bands<T, R>(reader: R) -> Result<BandSet<T>>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    let mut decoder = Decoder::new(reader)?;

    let (width, height) = decoder.dimensions()?;
    let rows = height as usize;
    let cols = width as usize;
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    // PlanarConfiguration: 1 = chunky (interleaved), 2 = planar
    let planar = decoder
        .get_tag_u32(Tag::PlanarConfiguration)
        .map(|v| v == 2)
        .unwrap_or(false);

    let data: Vec<T> = match decoder.read_image()? {
        DecodingResult::F32(buf) => cast_all!(buf),
        DecodingResult::F64(buf) => cast_all!(buf),
        DecodingResult::U8(buf) => cast_all!(buf),
        DecodingResult::U16(buf) => cast_all!(buf),
        DecodingResult::U32(buf) => cast_all!(buf),
        DecodingResult::I8(buf) => cast_all!(buf),
        DecodingResult::I16(buf) => cast_all!(buf),
        DecodingResult::I32(buf) => cast_all!(buf),
        _ => return Err(Error::UnsupportedDataType("Unsupported TIFF pixel format".to_string())),
    };

    let plane = rows * cols;
    if data.len() % plane != 0 {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }
    let samples = data.len() / plane;

    let mut bands = if planar {
        BandSet::from_planar(&data, rows, cols, samples)?
    } else {
        BandSet::from_interleaved(&data, rows, cols, samples)?
    };

    let transform = read_geotransform(&mut decoder);
    let crs = decoder
        .get_tag_u16_vec(GEO_KEY_DIRECTORY)
        .ok()
        .and_then(|keys| CRS::from_geo_keys(&keys));
    bands.set_georeference(transform.unwrap_or_default(), crs);

    if let Some(nodata) = read_nodata(&mut decoder) {
        bands.set_nodata(Some(T::from_f64(nodata)));
    }

    tracing::debug!(
        rows,
        cols,
        bands = bands.len(),
        crs = ?crs,
        georeferenced = transform.is_some(),
        "decoded GeoTIFF"
    );

    Ok(bands)
}

/// Read GeoTransform from ModelPixelScale + ModelTiepoint, or from
/// ModelTransformation.
fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(MODEL_PIXEL_SCALE).ok();
    let tiepoint = decoder.get_tag_f64_vec(MODEL_TIEPOINT).ok();
    if let (Some(scale), Some(tiepoint)) = (scale, tiepoint) {
        if let Some(gt) = GeoTransform::from_tiepoint(&scale, &tiepoint) {
            return Some(gt);
        }
    }

    decoder
        .get_tag_f64_vec(MODEL_TRANSFORMATION)
        .ok()
        .and_then(|t| GeoTransform::from_model_transformation(&t))
}

/// GDAL_NODATA is an ASCII tag holding the value as text
fn read_nodata<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    let text = decoder.get_tag_ascii_string(GDAL_NODATA).ok()?;
    text.trim_end_matches('\0').trim().parse::<f64>().ok()
}

/// Write a band set to an in-memory GeoTIFF buffer as 32-bit float.
///
/// One, three and four bands map to Gray, RGB and RGBA sample layouts; other
/// band counts are rejected.
pub fn write_bands_to_buffer<T>(bands: &BandSet<T>, options: &GeoTiffOptions) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    let mut buf = Vec::new();
    encode_bands(bands, options, Cursor::new(&mut buf))?;
    Ok(buf)
}

/// Internal: encode as GeoTIFF into any `Write + Seek` sink
fn encode_bands<T, W>(bands: &BandSet<T>, options: &GeoTiffOptions, writer: W) -> Result<()>
where
    T: RasterElement,
    W: std::io::Write + std::io::Seek,
{
    let mut encoder = TiffEncoder::new(writer)?;
    let (rows, cols) = bands.shape();
    let (w, h) = (cols as u32, rows as u32);

    // Interleave samples pixel by pixel
    let mut data = Vec::with_capacity(rows * cols * bands.len());
    for (r, c) in (0..rows).flat_map(|r| (0..cols).map(move |c| (r, c))) {
        for band in bands.bands() {
            let v = band.data()[(r, c)].to_f64().unwrap_or(f64::NAN);
            data.push(v as f32);
        }
    }

    macro_rules! write_image {
        ($color:ty) => {{
            let mut image = encoder.new_image::<$color>(w, h)?;
            write_geo_tags(image.encoder(), bands.transform(), options)?;
            image.write_data(&data)?;
        }};
    }

    match bands.len() {
        1 => write_image!(Gray32Float),
        3 => write_image!(RGB32Float),
        4 => write_image!(RGBA32Float),
        n => {
            return Err(Error::UnsupportedDataType(format!(
                "cannot encode {} bands",
                n
            )))
        }
    }

    Ok(())
}

fn write_geo_tags<W, K>(
    dir: &mut tiff::encoder::DirectoryEncoder<'_, W, K>,
    gt: &GeoTransform,
    options: &GeoTiffOptions,
) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
    K: tiff::encoder::TiffKind,
{
    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    dir.write_tag(MODEL_PIXEL_SCALE, &scale[..])?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    dir.write_tag(MODEL_TIEPOINT, &tiepoint[..])?;

    if let Some(epsg) = options.epsg {
        let (model_type, crs_key) = if CRS::from_epsg(epsg as u32).is_geographic() {
            (2, 2048) // ModelTypeGeographic, GeographicTypeGeoKey
        } else {
            (1, 3072) // ModelTypeProjected, ProjectedCSTypeGeoKey
        };
        let geokeys: [u16; 16] = [
            1, 1, 0, 3, // Version 1.1.0, 3 keys
            1024, 0, 1, model_type, // GTModelTypeGeoKey
            1025, 0, 1, 1, // GTRasterTypeGeoKey = RasterPixelIsArea
            crs_key, 0, 1, epsg,
        ];
        dir.write_tag(GEO_KEY_DIRECTORY, &geokeys[..])?;
    }

    if let Some(nodata) = options.nodata {
        let text = format!("{}", nodata);
        dir.write_tag(GDAL_NODATA, text.as_str())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_band_set() -> BandSet<f32> {
        let data: Vec<f32> = (0..2 * 3 * 3).map(|v| v as f32).collect();
        let mut set = BandSet::from_interleaved(&data, 2, 3, 3).unwrap();
        set.set_georeference(GeoTransform::new(-5.0, 7.0, 0.001, -0.001), None);
        set
    }

    #[test]
    fn decode_keeps_band_order() {
        let buf = write_bands_to_buffer(&three_band_set(), &GeoTiffOptions::default()).unwrap();
        let decoded = read_bands_from_buffer::<f64>(&buf).unwrap();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded.shape(), (2, 3));
        // pixel (1, 2) is the 6th pixel: samples 15, 16, 17
        assert_eq!(decoded.pixel(1, 2), vec![Some(15.0), Some(16.0), Some(17.0)]);
    }

    #[test]
    fn decode_reads_georeference() {
        let options = GeoTiffOptions {
            epsg: Some(4326),
            nodata: Some(-9999.0),
        };
        let buf = write_bands_to_buffer(&three_band_set(), &options).unwrap();
        let decoded = read_bands_from_buffer::<f32>(&buf).unwrap();

        let gt = decoded.transform();
        assert!((gt.origin_x + 5.0).abs() < 1e-9);
        assert!((gt.pixel_height + 0.001).abs() < 1e-9);
        assert_eq!(decoded.crs().map(|c| c.epsg()), Some(4326));
        assert_eq!(decoded.band(0).unwrap().nodata(), Some(-9999.0));
    }

    #[test]
    fn geo_tags_use_registered_tag_names() {
        let options = GeoTiffOptions {
            epsg: Some(4326),
            nodata: Some(-9999.0),
        };
        let buf = write_bands_to_buffer(&three_band_set(), &options).unwrap();
        let mut decoder = Decoder::new(Cursor::new(&buf[..])).unwrap();

        let keys = decoder.get_tag_u16_vec(Tag::GeoKeyDirectoryTag).unwrap();
        assert_eq!(&keys[..4], &[1, 1, 0, 3]);
        assert_eq!(&keys[12..], &[2048, 0, 1, 4326]);
        let scale = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag).unwrap();
        assert_eq!(scale, vec![0.001, 0.001, 0.0]);
        assert!(decoder.get_tag_f64_vec(Tag::ModelTiepointTag).is_ok());
        assert_eq!(read_nodata(&mut decoder), Some(-9999.0));
    }

    #[test]
    fn projected_epsg_round_trips() {
        let mut set = three_band_set();
        set.set_georeference(GeoTransform::new(440_000.0, 4_475_000.0, 10.0, -10.0), None);
        let options = GeoTiffOptions {
            epsg: Some(32630),
            nodata: None,
        };
        let buf = write_bands_to_buffer(&set, &options).unwrap();
        let decoded = read_bands_from_buffer::<f32>(&buf).unwrap();

        let crs = decoded.crs().copied().unwrap();
        assert_eq!(crs.epsg(), 32630);
        assert!(!crs.is_geographic());
        assert!((decoded.transform().origin_y - 4_475_000.0).abs() < 1e-6);
    }

    #[test]
    fn single_band_read() {
        let buf = write_bands_to_buffer(&three_band_set(), &GeoTiffOptions::default()).unwrap();
        let band = read_geotiff_from_buffer::<f32>(&buf, Some(2)).unwrap();
        assert_eq!(band.get(0, 0).unwrap(), 2.0);
        assert!(matches!(
            read_geotiff_from_buffer::<f32>(&buf, Some(5)),
            Err(Error::MissingBand { index: 5, count: 3 })
        ));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = read_bands_from_buffer::<f32>(b"not a tiff at all").unwrap_err();
        assert!(matches!(err, Error::Decode(_) | Error::Io(_)));
    }

    #[test]
    fn two_bands_cannot_be_encoded() {
        let set = BandSet::from_interleaved(&[1.0f32, 2.0], 1, 1, 2).unwrap();
        assert!(write_bands_to_buffer(&set, &GeoTiffOptions::default()).is_err());
    }
}

//! PROJ definitions for the coordinate reference systems known by code.

use geo_common::Crs;
use std::borrow::Cow;

/// PROJ string for an EPSG code, if known.
///
/// Covers geographic WGS84/NAD83, Web Mercator, World Mercator, the NSIDC
/// polar stereographic grids and every WGS84 UTM zone.
pub fn epsg_proj_string(code: u32) -> Option<Cow<'static, str>> {
    let def = match code {
        4326 => "+proj=longlat +datum=WGS84 +no_defs",
        4269 => "+proj=longlat +ellps=GRS80 +towgs84=0,0,0 +no_defs",
        3857 => {
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs"
        }
        3395 => "+proj=merc +lon_0=0 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
        3413 => {
            "+proj=stere +lat_0=90 +lat_ts=70 +lon_0=-45 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs"
        }
        3031 => {
            "+proj=stere +lat_0=-90 +lat_ts=-71 +lon_0=0 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs"
        }
        32601..=32660 => {
            return Some(Cow::Owned(format!(
                "+proj=utm +zone={} +datum=WGS84 +units=m +no_defs",
                code - 32600
            )))
        }
        32701..=32760 => {
            return Some(Cow::Owned(format!(
                "+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs",
                code - 32700
            )))
        }
        _ => return None,
    };
    Some(Cow::Borrowed(def))
}

/// PROJ string for any CRS: registry lookup for codes, passthrough for PROJ strings.
pub fn proj_string(crs: &Crs) -> Option<Cow<'_, str>> {
    match crs {
        Crs::Epsg(code) => epsg_proj_string(*code),
        Crs::Proj(def) => Some(Cow::Borrowed(def.as_str())),
    }
}

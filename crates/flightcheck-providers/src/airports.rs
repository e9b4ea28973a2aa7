//! Airport-proximity fallback for airspace classification
//!
//! Used when the FAA polygon layers return nothing conclusive. A static
//! table of airports with published airspace (FAA Chart Supplement and
//! sectional charts) plus great-circle distance gives a conservative
//! guess at whether a point sits inside controlled airspace.

use flightcheck_core::TriState;
use serde::Serialize;

/// One airport with published controlled airspace
#[derive(Debug, Clone, Copy)]
pub struct Airport {
    pub icao: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    /// B, C, or D
    pub airspace_class: char,
    /// Typical airspace radius in nautical miles
    pub radius_nm: f64,
    /// Typical ceiling in feet
    pub ceiling_ft: u32,
}

const fn apt(
    icao: &'static str,
    name: &'static str,
    lat: f64,
    lon: f64,
    airspace_class: char,
    radius_nm: f64,
    ceiling_ft: u32,
) -> Airport {
    Airport {
        icao,
        name,
        lat,
        lon,
        airspace_class,
        radius_nm,
        ceiling_ft,
    }
}

/// US airports with published airspace. Class B hubs carry 30 nm Mode C
/// veils; Class C runs 10 nm / 4000 ft typical; Class D 4 nm / 2500 ft.
pub static AIRPORTS: &[Airport] = &[
    // Class B (major hubs)
    apt("KATL", "Hartsfield-Jackson Atlanta", 33.6367, -84.4281, 'B', 30.0, 10000),
    apt("KORD", "Chicago O'Hare", 41.9742, -87.9073, 'B', 30.0, 10000),
    apt("KLAX", "Los Angeles International", 33.9425, -118.4081, 'B', 30.0, 10000),
    apt("KDFW", "Dallas/Fort Worth", 32.8998, -97.0403, 'B', 30.0, 11000),
    apt("KDEN", "Denver International", 39.8561, -104.6737, 'B', 30.0, 12000),
    apt("KJFK", "New York JFK", 40.6413, -73.7781, 'B', 30.0, 7000),
    apt("KSFO", "San Francisco International", 37.6213, -122.3790, 'B', 30.0, 10000),
    apt("KSEA", "Seattle-Tacoma", 47.4502, -122.3088, 'B', 30.0, 10000),
    apt("KLAS", "Las Vegas McCarran", 36.0840, -115.1537, 'B', 30.0, 10000),
    apt("KMCO", "Orlando International", 28.4294, -81.3089, 'B', 30.0, 10000),
    apt("KPHX", "Phoenix Sky Harbor", 33.4352, -112.0101, 'B', 30.0, 10000),
    apt("KIAH", "Houston Bush Intercontinental", 29.9902, -95.3368, 'B', 30.0, 10000),
    apt("KBOS", "Boston Logan", 42.3656, -71.0096, 'B', 30.0, 7000),
    apt("KMIA", "Miami International", 25.7959, -80.2870, 'B', 30.0, 7000),
    apt("KEWR", "Newark Liberty", 40.6895, -74.1745, 'B', 30.0, 7000),
    apt("KMSP", "Minneapolis-St Paul", 44.8848, -93.2223, 'B', 30.0, 10000),
    apt("KDTW", "Detroit Metro Wayne", 42.2124, -83.3534, 'B', 30.0, 9000),
    apt("KPHL", "Philadelphia International", 39.8729, -75.2437, 'B', 30.0, 7000),
    apt("KCLT", "Charlotte Douglas", 35.2144, -80.9473, 'B', 30.0, 10000),
    apt("KSLC", "Salt Lake City", 40.7899, -111.9791, 'B', 30.0, 10000),
    apt("KDCA", "Washington Reagan National", 38.8521, -77.0377, 'B', 30.0, 7000),
    apt("KBWI", "Baltimore/Washington Int'l", 39.1754, -76.6683, 'B', 30.0, 8000),
    apt("KIAD", "Washington Dulles", 38.9531, -77.4565, 'B', 30.0, 8000),
    apt("KSTL", "St. Louis Lambert", 38.7487, -90.3700, 'B', 30.0, 10000),
    apt("KMDW", "Chicago Midway", 41.7868, -87.7522, 'B', 30.0, 8000),
    apt("KSAN", "San Diego International", 32.7336, -117.1897, 'B', 30.0, 10000),
    apt("KTPA", "Tampa International", 27.9755, -82.5332, 'B', 30.0, 10000),
    apt("KHOU", "Houston Hobby", 29.6454, -95.2789, 'B', 30.0, 8000),
    apt("KCVG", "Cincinnati/Northern Kentucky", 39.0488, -84.6678, 'B', 30.0, 10000),
    apt("KMEM", "Memphis International", 35.0424, -89.9767, 'B', 30.0, 9000),
    apt("KPBI", "Palm Beach International", 26.6832, -80.0956, 'B', 30.0, 8000),
    apt("PHNL", "Daniel K. Inouye International", 21.3187, -157.9225, 'B', 30.0, 7000),
    // Class C (regional hubs)
    apt("KOAK", "Oakland International", 37.7213, -122.2208, 'C', 10.0, 4000),
    apt("KSJC", "San Jose International", 37.3626, -121.9290, 'C', 10.0, 4000),
    apt("KSMF", "Sacramento International", 38.6954, -121.5908, 'C', 10.0, 4000),
    apt("KONT", "Ontario International", 34.0560, -117.6012, 'C', 10.0, 4000),
    apt("KBUR", "Burbank Airport", 34.2007, -118.3587, 'C', 10.0, 4000),
    apt("KSNA", "John Wayne Orange County", 33.6757, -117.8682, 'C', 10.0, 4000),
    apt("KPDX", "Portland International", 45.5887, -122.5975, 'C', 10.0, 4000),
    apt("KBOI", "Boise Air Terminal", 43.5644, -116.2228, 'C', 10.0, 4000),
    apt("KGEG", "Spokane International", 47.6199, -117.5339, 'C', 10.0, 4000),
    apt("KAUS", "Austin-Bergstrom", 30.1945, -97.6699, 'C', 10.0, 4000),
    apt("KSAT", "San Antonio International", 29.5337, -98.4698, 'C', 10.0, 4000),
    apt("KRNO", "Reno-Tahoe International", 39.4991, -119.7681, 'C', 10.0, 4000),
    apt("KCOS", "Colorado Springs", 38.8058, -104.7013, 'C', 10.0, 4000),
    apt("KABQ", "Albuquerque International", 35.0402, -106.6092, 'C', 10.0, 4000),
    apt("KTUS", "Tucson International", 32.1161, -110.9410, 'C', 10.0, 4000),
    apt("KOMA", "Omaha Eppley Airfield", 41.3032, -95.8941, 'C', 10.0, 4000),
    apt("KIND", "Indianapolis International", 39.7173, -86.2944, 'C', 10.0, 4000),
    apt("KCMH", "Columbus International", 39.9980, -82.8919, 'C', 10.0, 4000),
    apt("KBNA", "Nashville International", 36.1245, -86.6782, 'C', 10.0, 4000),
    apt("KMKE", "Milwaukee Mitchell", 42.9472, -87.8966, 'C', 10.0, 4000),
    apt("KRDU", "Raleigh-Durham", 35.8801, -78.7874, 'C', 10.0, 4000),
    apt("KMSY", "New Orleans Louis Armstrong", 29.9934, -90.2580, 'C', 10.0, 4000),
    apt("KFLL", "Fort Lauderdale-Hollywood", 26.0726, -80.1527, 'C', 10.0, 4000),
    apt("KJAX", "Jacksonville International", 30.4941, -81.6879, 'C', 10.0, 4000),
    apt("KPIT", "Pittsburgh International", 40.4915, -80.2329, 'C', 10.0, 4000),
    apt("KBDL", "Bradley International Hartford", 41.9389, -72.6832, 'C', 10.0, 4000),
    apt("KBUF", "Buffalo Niagara", 42.9405, -78.7322, 'C', 10.0, 4000),
    apt("KBTV", "Burlington International", 44.4719, -73.1533, 'C', 10.0, 4000),
    apt("PANC", "Ted Stevens Anchorage", 61.1744, -149.9962, 'C', 10.0, 4000),
    // Class D (towered fields, rural coverage)
    apt("KMSO", "Missoula International", 46.9163, -114.0906, 'D', 4.0, 2500),
    apt("KHLN", "Helena Regional", 46.6068, -111.9828, 'D', 4.0, 2500),
    apt("KBZN", "Bozeman Yellowstone", 45.7775, -111.1603, 'D', 4.0, 2500),
    apt("KGPI", "Glacier Park International", 48.3105, -114.2559, 'D', 4.0, 2500),
    apt("KCYS", "Cheyenne Regional", 41.1557, -104.8122, 'D', 4.0, 2500),
    apt("KJAC", "Jackson Hole", 43.6073, -110.7377, 'D', 4.0, 2500),
    apt("KFAR", "Hector International Fargo", 46.9207, -96.8158, 'D', 4.0, 2500),
    apt("KBIS", "Bismarck Municipal", 46.7727, -100.7467, 'D', 4.0, 2500),
    apt("KRAP", "Rapid City Regional", 44.0453, -103.0574, 'D', 4.0, 2500),
    apt("KFSD", "Sioux Falls Regional", 43.5820, -96.7419, 'D', 4.0, 2500),
    apt("KIDA", "Idaho Falls Regional", 43.5146, -112.0707, 'D', 4.0, 2500),
    apt("KEKO", "Elko Regional", 40.8249, -115.7917, 'D', 4.0, 2500),
    apt("KEUG", "Eugene Mahlon Sweet", 44.1246, -123.2119, 'D', 4.0, 2500),
    apt("KMFR", "Rogue Valley International Medford", 42.3742, -122.8735, 'D', 4.0, 2500),
    apt("KBLI", "Bellingham International", 48.7928, -122.5375, 'D', 4.0, 2500),
    apt("KSAF", "Santa Fe Regional", 35.6171, -106.0881, 'D', 4.0, 2500),
    apt("KBGR", "Bangor International", 44.8074, -68.8281, 'D', 4.0, 2500),
    apt("PAFA", "Fairbanks International", 64.8151, -147.8561, 'D', 4.0, 2500),
    apt("PHOG", "Kahului Maui", 20.8986, -156.4305, 'D', 4.0, 2500),
];

/// Earth radius in nautical miles
const EARTH_RADIUS_NM: f64 = 3440.065;

/// Great-circle distance in nautical miles
pub fn haversine_nm(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    EARTH_RADIUS_NM * 2.0 * a.sqrt().asin()
}

/// Nearest listed airport within `max_distance_nm`, if any
pub fn find_nearest_airport(
    latitude: f64,
    longitude: f64,
    max_distance_nm: f64,
) -> Option<(&'static Airport, f64)> {
    AIRPORTS
        .iter()
        .map(|airport| {
            (
                airport,
                haversine_nm(latitude, longitude, airport.lat, airport.lon),
            )
        })
        .filter(|(_, distance)| *distance <= max_distance_nm)
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
}

/// Proximity-based classification result
#[derive(Debug, Clone, Serialize)]
pub struct ProximityClassification {
    pub airspace_class: String,
    pub laanc_required: TriState,
    pub ceiling_ft: Option<u32>,
    pub facility: String,
    pub distance_nm: Option<f64>,
}

/// Classify airspace by airport proximity.
///
/// Conservative: within a listed airport's published radius means
/// controlled/authorization required. Ceilings are deliberately withheld
/// for matches because LAANC grid ceilings vary by exact location and
/// must be verified with an FAA-approved provider.
pub fn classify_by_proximity(
    latitude: f64,
    longitude: f64,
    _altitude_ft_agl: f64,
) -> ProximityClassification {
    let Some((airport, distance_nm)) = find_nearest_airport(latitude, longitude, 15.0) else {
        return ProximityClassification {
            airspace_class: "Class G".to_string(),
            laanc_required: TriState::No,
            ceiling_ft: None,
            facility: "Uncontrolled airspace (no nearby airports)".to_string(),
            distance_nm: None,
        };
    };

    if distance_nm > airport.radius_nm {
        return ProximityClassification {
            airspace_class: "Class G".to_string(),
            laanc_required: TriState::No,
            ceiling_ft: None,
            facility: "Uncontrolled airspace (outside controlled zones)".to_string(),
            distance_nm: Some(distance_nm),
        };
    }

    ProximityClassification {
        airspace_class: format!("Class {}", airport.airspace_class),
        laanc_required: TriState::Yes,
        ceiling_ft: None,
        facility: airport.name.to_string(),
        distance_nm: Some(distance_nm),
    }
}

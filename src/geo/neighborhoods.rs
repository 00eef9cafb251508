// Curated Miami / Miami Beach neighborhoods with approximate centers.

/// (name, latitude, longitude). Lookup walks this slice in order, so the first
/// of two equally distant centers wins.
pub const NEIGHBORHOOD_CENTERS: &[(&str, f64, f64)] = &[
    ("South Beach", 25.7826, -80.1341),
    ("Mid-Beach", 25.8147, -80.1228),
    ("North Beach", 25.8580, -80.1210),
    ("Surfside", 25.8784, -80.1256),
    ("Bal Harbour", 25.8918, -80.1267),
    ("Bay Harbor Islands", 25.8876, -80.1317),
    ("Sunny Isles Beach", 25.9506, -80.1228),
    ("Aventura", 25.9565, -80.1392),
    ("North Miami", 25.8901, -80.1867),
    ("Miami Shores", 25.8631, -80.1928),
    ("Little River", 25.8440, -80.1860),
    ("Upper East Side", 25.8370, -80.1840),
    ("Little Haiti", 25.8300, -80.1950),
    ("Design District", 25.8130, -80.1930),
    ("Midtown", 25.8087, -80.1925),
    ("Wynwood", 25.8010, -80.1994),
    ("Edgewater", 25.7995, -80.1870),
    ("Allapattah", 25.8150, -80.2240),
    ("Hialeah", 25.8576, -80.2781),
    ("Doral", 25.8195, -80.3553),
    ("Overtown", 25.7866, -80.2009),
    ("Downtown Miami", 25.7743, -80.1937),
    ("Brickell", 25.7617, -80.1918),
    ("Little Havana", 25.7668, -80.2198),
    ("Coral Gables", 25.7215, -80.2684),
    ("Coconut Grove", 25.7280, -80.2410),
    ("South Miami", 25.7079, -80.2934),
    ("Kendall", 25.6793, -80.3173),
    ("Key Biscayne", 25.6938, -80.1628),
    ("Fisher Island", 25.7606, -80.1420),
];

/// Neighborhoods offered when a query for the key returns nothing.
pub const ADJACENT_NEIGHBORHOODS: &[(&str, &[&str])] = &[
    ("South Beach", &["Mid-Beach", "Fisher Island"]),
    ("Mid-Beach", &["South Beach", "North Beach"]),
    ("North Beach", &["Mid-Beach", "Surfside"]),
    ("Surfside", &["North Beach", "Bal Harbour", "Bay Harbor Islands"]),
    ("Bal Harbour", &["Surfside", "Bay Harbor Islands", "Sunny Isles Beach"]),
    ("Bay Harbor Islands", &["Bal Harbour", "Surfside", "North Miami"]),
    ("Sunny Isles Beach", &["Bal Harbour", "Aventura"]),
    ("Aventura", &["Sunny Isles Beach", "North Miami"]),
    ("North Miami", &["Aventura", "Miami Shores", "Bay Harbor Islands"]),
    ("Miami Shores", &["North Miami", "Little River", "Upper East Side"]),
    ("Little River", &["Miami Shores", "Little Haiti", "Upper East Side"]),
    ("Upper East Side", &["Little River", "Miami Shores", "Design District"]),
    ("Little Haiti", &["Little River", "Design District", "Allapattah"]),
    ("Design District", &["Midtown", "Little Haiti", "Upper East Side", "Wynwood"]),
    ("Midtown", &["Wynwood", "Design District", "Edgewater"]),
    ("Wynwood", &["Midtown", "Edgewater", "Allapattah", "Overtown", "Design District"]),
    ("Edgewater", &["Midtown", "Wynwood", "Downtown Miami"]),
    ("Allapattah", &["Wynwood", "Little Haiti", "Overtown", "Hialeah"]),
    ("Hialeah", &["Allapattah", "Doral"]),
    ("Doral", &["Hialeah"]),
    ("Overtown", &["Downtown Miami", "Wynwood", "Allapattah", "Little Havana"]),
    ("Downtown Miami", &["Brickell", "Overtown", "Edgewater"]),
    ("Brickell", &["Downtown Miami", "Little Havana", "Coconut Grove", "Key Biscayne"]),
    ("Little Havana", &["Brickell", "Overtown", "Coral Gables"]),
    ("Coral Gables", &["Little Havana", "Coconut Grove", "South Miami"]),
    ("Coconut Grove", &["Brickell", "Coral Gables", "South Miami"]),
    ("South Miami", &["Coral Gables", "Coconut Grove", "Kendall"]),
    ("Kendall", &["South Miami"]),
    ("Key Biscayne", &["Brickell"]),
    ("Fisher Island", &["South Beach"]),
];

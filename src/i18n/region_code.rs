pub struct RegionCode {}

impl RegionCode {
    /// Returns a region code string representing the "unknown" region.
    pub fn get_unknown() -> &'static str {
        return Self::zz();
    }

    pub fn zz() -> &'static str {
        return "ZZ";
    }

    /// The region code reserved for non-geographical entities, e.g. the
    /// International Toll Free Service (+800).
    pub fn un001() -> &'static str {
        return "001";
    }
}

pub struct RegionCode {}

#[allow(unused)]
impl RegionCode {
    pub fn ar() -> &'static str {
        "AR"
    }

    pub fn bs() -> &'static str {
        "BS"
    }

    pub fn de() -> &'static str {
        "DE"
    }

    pub fn fr() -> &'static str {
        "FR"
    }

    pub fn gb() -> &'static str {
        "GB"
    }

    pub fn it() -> &'static str {
        "IT"
    }

    pub fn jp() -> &'static str {
        "JP"
    }

    pub fn nz() -> &'static str {
        "NZ"
    }

    pub fn us() -> &'static str {
        "US"
    }

    pub fn un001() -> &'static str {
        "001"
    }

    pub fn zz() -> &'static str {
        "ZZ"
    }

    pub fn get_unknown() -> &'static str {
        Self::zz()
    }
}

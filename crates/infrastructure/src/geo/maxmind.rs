use super::database::DatasetParser;
use compact_str::CompactString;
use geosplit_application::ports::CountryLookup;
use geosplit_domain::DomainError;
use maxminddb::{geoip2, MaxMindDBError, Reader};
use std::net::IpAddr;

/// Parses MaxMind DB (`.mmdb`) files such as GeoLite2-Country.
pub struct MaxMindParser;

impl DatasetParser for MaxMindParser {
    fn parse(&self, bytes: Vec<u8>) -> Result<Box<dyn CountryLookup>, DomainError> {
        let reader = Reader::from_source(bytes).map_err(|e| {
            DomainError::GeoDatabaseError(format!("Invalid MaxMind database: {}", e))
        })?;
        Ok(Box::new(MaxMindDataset { reader }))
    }
}

struct MaxMindDataset {
    reader: Reader<Vec<u8>>,
}

impl CountryLookup for MaxMindDataset {
    fn country_code(&self, ip: IpAddr) -> Result<Option<CompactString>, DomainError> {
        match self.reader.lookup::<geoip2::Country>(ip) {
            Ok(record) => Ok(record
                .country
                .and_then(|c| c.iso_code)
                .map(CompactString::new)),
            Err(MaxMindDBError::AddressNotFoundError(_)) => {
                Err(DomainError::GeoAddressNotFound(ip.to_string()))
            }
            Err(e) => Err(DomainError::GeoDatabaseError(e.to_string())),
        }
    }
}

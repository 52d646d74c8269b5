use std::io::Write;

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use cerp_rates::Snapshot;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::config::OutputFormat;

/// Render `snapshot` as the document written to stdout.
pub fn render(snapshot: &Snapshot, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(snapshot.to_json()?),
        OutputFormat::Pretty => Ok(snapshot.to_json_pretty()?),
        OutputFormat::Compressed => compress(&snapshot.to_json()?),
    }
}

/// zlib-compress `json`, then base64-encode it.
pub fn compress(json: &str) -> anyhow::Result<String> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(json.as_bytes())
        .context("Failed to compress snapshot")?;
    let bytes = encoder.finish().context("Failed to compress snapshot")?;
    Ok(BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cerp_rates::{Country, IndexEntry, IndexRates, RateSet, ScaledRate};
    use flate2::read::ZlibDecoder;
    use std::collections::BTreeMap;
    use std::io::Read;

    fn decompress(encoded: &str) -> String {
        let bytes = BASE64.decode(encoded.trim()).unwrap();
        let mut json = String::new();
        ZlibDecoder::new(bytes.as_slice())
            .read_to_string(&mut json)
            .unwrap();
        json
    }

    fn snapshot() -> Snapshot {
        let mut bank = RateSet::new();
        bank.insert_pair("USD", ScaledRate::new(894500), ScaledRate::new(897000));

        let mut all_rates = IndexRates::new();
        all_rates.insert(
            "USD".to_string(),
            IndexEntry::new("USD", 1, ScaledRate::new(894500)),
        );

        Snapshot {
            country: Country::Kg,
            date_key: "2024-3-7".to_string(),
            timestamp: 1_709_791_200,
            bank_rates: BTreeMap::from([("kg_bta".into(), bank)]),
            all_rates,
        }
    }

    #[test]
    fn test_compressed_document_decodes_to_json() {
        let snapshot = snapshot();
        let document = render(&snapshot, OutputFormat::Compressed).unwrap();

        assert!(!document.contains('{'));
        assert_eq!(decompress(&document), snapshot.to_json().unwrap());
    }

    #[test]
    fn test_compressed_document_is_zlib_stream() {
        let document = compress("{}").unwrap();
        let bytes = BASE64.decode(document).unwrap();
        // zlib header with default compression
        assert_eq!(&bytes[..2], &[0x78, 0x9c]);
    }

    #[test]
    fn test_plain_formats() {
        let snapshot = snapshot();
        assert_eq!(
            render(&snapshot, OutputFormat::Json).unwrap(),
            snapshot.to_json().unwrap()
        );
        assert!(render(&snapshot, OutputFormat::Pretty).unwrap().contains('\n'));
    }
}

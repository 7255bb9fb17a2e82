//! Derivação da chave de cache.
//!
//! A chave é concatenação exata de strings, não um hash: entradas iguais
//! geram a mesma chave e qualquer diferença num campo que participa gera
//! chave diferente.
//!
//! Só energia, água e resíduos de cada estágio entram na chave, junto com
//! reciclagem, reuso e tipo de metal dos dados agregados. CO₂, distância de
//! transporte, reciclagem do estágio e eficiência ficam de fora: mudar
//! apenas esses campos devolve o resultado já cacheado.

use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::types::requests::{OverallData, Stage};

/// Separa os campos dentro de um estágio e dentro dos dados agregados.
pub const FIELD_SEPARATOR: char = ',';

/// Separa estágios consecutivos.
pub const STAGE_SEPARATOR: char = ';';

/// Separa a metade dos estágios da metade dos dados agregados.
pub const SECTION_DELIMITER: char = '|';

/// Gera a chave de cache para uma sequência de estágios + dados agregados.
///
/// A ordem dos estágios importa.
pub fn cache_key(stages: &[Stage], overall: &OverallData) -> String {
    let mut key = String::with_capacity(stages.len() * 16 + 32);

    for (i, stage) in stages.iter().enumerate() {
        if i > 0 {
            key.push(STAGE_SEPARATOR);
        }
        // write! em String não falha
        let _ = write!(
            key,
            "{}{sep}{}{sep}{}",
            stage.energy_usage,
            stage.water_usage,
            stage.waste_generated,
            sep = FIELD_SEPARATOR
        );
    }

    key.push(SECTION_DELIMITER);

    let _ = write!(
        key,
        "{}{sep}{}{sep}{}",
        overall.recycle_percentage,
        overall.reuse_percentage,
        overall.metal_type_or_unknown(),
        sep = FIELD_SEPARATOR
    );

    key
}

/// Impressão digital curta da chave, para logs.
pub fn fingerprint(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    hex::encode(&digest[..6])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stages() -> Vec<Stage> {
        vec![
            Stage::new("Mining", 25.0, 2.5, 8.0),
            Stage::new("Smelting", 35.0, 4.2, 1.5),
        ]
    }

    #[test]
    fn test_key_format() {
        let overall = OverallData::new(25.0, 10.0, 65.0).with_metal_type("Aluminum");
        let key = cache_key(&sample_stages(), &overall);

        assert_eq!(key, "25,2.5,8;35,4.2,1.5|25,10,Aluminum");
    }

    #[test]
    fn test_key_is_deterministic() {
        let overall = OverallData::new(25.0, 10.0, 65.0);
        let key1 = cache_key(&sample_stages(), &overall);
        let key2 = cache_key(&sample_stages(), &overall);

        assert_eq!(key1, key2);
    }

    #[test]
    fn test_missing_metal_type_is_unknown() {
        let overall = OverallData::new(0.0, 0.0, 0.0);
        let key = cache_key(&[], &overall);

        assert_eq!(key, "|0,0,unknown");
    }

    #[test]
    fn test_stage_order_matters() {
        let overall = OverallData::new(25.0, 10.0, 65.0);
        let mut reversed = sample_stages();
        reversed.reverse();

        assert_ne!(
            cache_key(&sample_stages(), &overall),
            cache_key(&reversed, &overall)
        );
    }

    #[test]
    fn test_contributing_fields_change_key() {
        let overall = OverallData::new(25.0, 10.0, 65.0);
        let base = cache_key(&sample_stages(), &overall);

        let mut stages = sample_stages();
        stages[1].waste_generated = 1.6;
        assert_ne!(base, cache_key(&stages, &overall));

        let other = OverallData::new(25.0, 11.0, 65.0);
        assert_ne!(base, cache_key(&sample_stages(), &other));

        let metal = OverallData::new(25.0, 10.0, 65.0).with_metal_type("Steel");
        assert_ne!(base, cache_key(&sample_stages(), &metal));
    }

    #[test]
    fn test_ignored_fields_do_not_change_key() {
        let overall = OverallData::new(25.0, 10.0, 65.0);
        let base = cache_key(&sample_stages(), &overall);

        let stages: Vec<Stage> = sample_stages()
            .into_iter()
            .map(|s| {
                s.with_co2(999.0)
                    .with_transport(1200.0)
                    .with_recycling(80.0)
                    .with_efficiency(40.0)
            })
            .collect();
        assert_eq!(base, cache_key(&stages, &overall));

        // Aterro também não participa
        let landfill = OverallData::new(25.0, 10.0, 5.0);
        assert_eq!(base, cache_key(&sample_stages(), &landfill));
    }

    #[test]
    fn test_fingerprint() {
        let fp = fingerprint("25,2.5,8|25,10,unknown");
        assert_eq!(fp.len(), 12);
        assert_eq!(fp, fingerprint("25,2.5,8|25,10,unknown"));
        assert_ne!(fp, fingerprint("25,2.5,9|25,10,unknown"));
    }
}

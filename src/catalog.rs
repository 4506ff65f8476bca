//! Closed catalog of report families and their upstream query codes.
//!
//! The Vitibrasil site selects a report with `opcao` and, for some families,
//! a `subopcao` query parameter. Each family's subtype set is a fixed
//! enumeration, so subtype handling is exhaustiveness-checked at compile
//! time instead of going through an open string map.

use crate::error::{Error, Result};

/// First year with recorded data on the upstream site.
pub const MIN_YEAR: i32 = 1970;
/// Last year with recorded data on the upstream site.
pub const MAX_YEAR: i32 = 2023;

/// Reject years the upstream site has no data for.
pub fn validate_year(ano: i32) -> Result<()> {
    if (MIN_YEAR..=MAX_YEAR).contains(&ano) {
        Ok(())
    } else {
        Err(Error::InvalidYear {
            got: ano,
            min: MIN_YEAR,
            max: MAX_YEAR,
        })
    }
}

/// Top-level report family. Maps one-to-one onto the site's `opcao` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Producao,
    Processamento,
    Comercializacao,
    Importacao,
    Exportacao,
}

impl Family {
    /// Upstream `opcao` query code.
    pub fn opcao(self) -> &'static str {
        match self {
            Family::Producao => "opt_02",
            Family::Processamento => "opt_03",
            Family::Comercializacao => "opt_04",
            Family::Importacao => "opt_05",
            Family::Exportacao => "opt_06",
        }
    }

    /// Table name used by the cache for this family.
    pub fn table(self) -> &'static str {
        match self {
            Family::Producao => "producao",
            Family::Processamento => "processamento",
            Family::Comercializacao => "comercializacao",
            Family::Importacao => "importacao",
            Family::Exportacao => "exportacao",
        }
    }
}

/// Grape group dimension of the processing reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessingGroup {
    Viniferas,
    AmericanasHibridas,
    UvasMesa,
    SemClassificacao,
}

impl ProcessingGroup {
    pub const ALL: [ProcessingGroup; 4] = [
        ProcessingGroup::Viniferas,
        ProcessingGroup::AmericanasHibridas,
        ProcessingGroup::UvasMesa,
        ProcessingGroup::SemClassificacao,
    ];

    /// Resolve a URL path segment. Unknown segments are a caller error.
    pub fn from_path(path: &str) -> Result<Self> {
        match path {
            "viniferas" => Ok(ProcessingGroup::Viniferas),
            "americanas-hibridas" => Ok(ProcessingGroup::AmericanasHibridas),
            "uvas-mesa" => Ok(ProcessingGroup::UvasMesa),
            "sem-classificacao" => Ok(ProcessingGroup::SemClassificacao),
            other => Err(Error::UnknownCategory(format!("processamento/{other}"))),
        }
    }

    /// Stable key used in responses and cache rows.
    pub fn key(self) -> &'static str {
        match self {
            ProcessingGroup::Viniferas => "viniferas",
            ProcessingGroup::AmericanasHibridas => "americanas_hibridas",
            ProcessingGroup::UvasMesa => "uvas_mesa",
            ProcessingGroup::SemClassificacao => "sem_classificacao",
        }
    }

    /// Upstream `subopcao` query code.
    pub fn subopcao(self) -> &'static str {
        match self {
            ProcessingGroup::Viniferas => "subopt_01",
            ProcessingGroup::AmericanasHibridas => "subopt_02",
            ProcessingGroup::UvasMesa => "subopt_03",
            ProcessingGroup::SemClassificacao => "subopt_04",
        }
    }
}

/// Product dimension of the import reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportProduct {
    VinhosMesa,
    Espumantes,
    UvasFrescas,
    UvasPassas,
    SucoUva,
}

impl ImportProduct {
    pub const ALL: [ImportProduct; 5] = [
        ImportProduct::VinhosMesa,
        ImportProduct::Espumantes,
        ImportProduct::UvasFrescas,
        ImportProduct::UvasPassas,
        ImportProduct::SucoUva,
    ];

    pub fn from_path(path: &str) -> Result<Self> {
        match path {
            "vinhos-mesa" => Ok(ImportProduct::VinhosMesa),
            "espumantes" => Ok(ImportProduct::Espumantes),
            "uvas-frescas" => Ok(ImportProduct::UvasFrescas),
            "uvas-passas" => Ok(ImportProduct::UvasPassas),
            "suco-uva" => Ok(ImportProduct::SucoUva),
            other => Err(Error::UnknownCategory(format!("importacao/{other}"))),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ImportProduct::VinhosMesa => "vinhos_mesa",
            ImportProduct::Espumantes => "espumantes",
            ImportProduct::UvasFrescas => "uvas_frescas",
            ImportProduct::UvasPassas => "uvas_passas",
            ImportProduct::SucoUva => "suco_uva",
        }
    }

    /// The default report (table wines) needs no `subopcao` at all.
    pub fn subopcao(self) -> Option<&'static str> {
        match self {
            ImportProduct::VinhosMesa => None,
            ImportProduct::Espumantes => Some("subopt_02"),
            ImportProduct::UvasFrescas => Some("subopt_03"),
            ImportProduct::UvasPassas => Some("subopt_04"),
            ImportProduct::SucoUva => Some("subopt_05"),
        }
    }
}

/// Product dimension of the export reports. One entry fewer than imports:
/// the site publishes no raisin export table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportProduct {
    VinhosMesa,
    Espumantes,
    UvasFrescas,
    SucoUva,
}

impl ExportProduct {
    pub const ALL: [ExportProduct; 4] = [
        ExportProduct::VinhosMesa,
        ExportProduct::Espumantes,
        ExportProduct::UvasFrescas,
        ExportProduct::SucoUva,
    ];

    pub fn from_path(path: &str) -> Result<Self> {
        match path {
            "vinhos-mesa" => Ok(ExportProduct::VinhosMesa),
            "espumantes" => Ok(ExportProduct::Espumantes),
            "uvas-frescas" => Ok(ExportProduct::UvasFrescas),
            "suco-uva" => Ok(ExportProduct::SucoUva),
            other => Err(Error::UnknownCategory(format!("exportacao/{other}"))),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ExportProduct::VinhosMesa => "vinhos_mesa",
            ExportProduct::Espumantes => "espumantes",
            ExportProduct::UvasFrescas => "uvas_frescas",
            ExportProduct::SucoUva => "suco_uva",
        }
    }

    pub fn subopcao(self) -> Option<&'static str> {
        match self {
            ExportProduct::VinhosMesa => None,
            ExportProduct::Espumantes => Some("subopt_02"),
            ExportProduct::UvasFrescas => Some("subopt_03"),
            ExportProduct::SucoUva => Some("subopt_04"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_year_bounds() {
        assert!(validate_year(1970).is_ok());
        assert!(validate_year(2023).is_ok());
        assert!(validate_year(1969).is_err());
        assert!(validate_year(2024).is_err());
    }

    #[test]
    fn test_processing_paths_round_trip() {
        for group in ProcessingGroup::ALL {
            let path = group.key().replace('_', "-");
            assert_eq!(ProcessingGroup::from_path(&path).unwrap(), group);
        }
        assert!(ProcessingGroup::from_path("cachaca").is_err());
    }

    #[test]
    fn test_import_export_subopcao_codes() {
        assert_eq!(ImportProduct::VinhosMesa.subopcao(), None);
        assert_eq!(ImportProduct::SucoUva.subopcao(), Some("subopt_05"));
        assert_eq!(ExportProduct::VinhosMesa.subopcao(), None);
        assert_eq!(ExportProduct::SucoUva.subopcao(), Some("subopt_04"));
    }

    #[test]
    fn test_unknown_subtype_is_client_error() {
        match ImportProduct::from_path("cerveja") {
            Err(Error::UnknownCategory(msg)) => assert!(msg.contains("cerveja")),
            other => panic!("expected UnknownCategory, got {other:?}"),
        }
    }
}

//! Architectural style catalog.
//!
//! The catalog serves two purposes that must never drift apart:
//!
//! - **Decoding**: position `i` in the catalog is the style the classifier
//!   scores at output index `i`. The built-in order is the label order the
//!   network was trained with.
//! - **Description**: lookup of the descriptive metadata by style name.
//!
//! Both views are built by a single constructor from the same record list.
//! A deployment whose model was trained with a different label order supplies
//! a label index file (one style name per line) instead of editing the data.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ArchError, Result};

/// Descriptive metadata for one architectural style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleRecord {
    /// Style label, unique within the catalog
    pub name: &'static str,
    /// Historical period
    pub era: &'static str,
    /// Characteristic features
    pub features: &'static str,
    /// Typical building materials
    pub materials: &'static str,
    /// Relation to other styles
    pub lineage: &'static str,
}

/// Built-in styles, in training label order.
const STYLES: &[StyleRecord] = &[
    StyleRecord {
        name: "Arquitectura aquemenida",
        era: "Imperio Persa (550-330 a.C.)",
        features: "Columnas altas y delgadas, terrazas monumentales, escaleras simétricas y relieves decorativos",
        materials: "Piedra caliza, mármol y madera de cedro",
        lineage: "Influenciada por la arquitectura mesopotámica y egipcia",
    },
    StyleRecord {
        name: "Estilo artesano americano",
        era: "Finales del siglo XIX - principios del siglo XX",
        features: "Porches amplios, vigas expuestas, líneas horizontales y trabajo artesanal detallado",
        materials: "Madera local, piedra y ladrillo",
        lineage: "Reacción contra la era industrial y el estilo victoriano",
    },
    StyleRecord {
        name: "Arquitectura American Foursquare",
        era: "1890s-1930s",
        features: "Forma cúbica, dos pisos y medio, techo en pirámide, porche frontal ancho",
        materials: "Madera, ladrillo o piedra arenisca",
        lineage: "Derivado del estilo Prairie School y una reacción al ornamentado estilo victoriano",
    },
    StyleRecord {
        name: "Arquitectura del antiguo Egipto",
        era: "3000 a.C. - 30 a.C.",
        features: "Monumentalidad, simetría, columnas masivas, jeroglíficos y relieves",
        materials: "Piedra caliza, granito y arenisca",
        lineage: "Influyó en muchos estilos posteriores, incluyendo el neoclásico",
    },
    StyleRecord {
        name: "Arquitectura Art Deco",
        era: "1920s-1930s",
        features: "Formas geométricas, zigzags, motivos escalonados y decoración suntuosa",
        materials: "Hormigón, acero, vidrio y materiales lujosos como el mármol",
        lineage: "Evolución del Art Nouveau y precursor del estilo internacional",
    },
    StyleRecord {
        name: "Arquitectura Art Nouveau",
        era: "1890-1910",
        features: "Líneas curvas orgánicas, motivos florales y naturales, asimetría",
        materials: "Hierro forjado, vidrio, cerámica y madera",
        lineage: "Reacción contra el academicismo del siglo XIX",
    },
    StyleRecord {
        name: "Arquitectura barroca",
        era: "Siglos XVII-XVIII",
        features: "Dramatismo, ornamentación excesiva, curvas y contracurvas",
        materials: "Mármol, piedra, estuco y oro",
        lineage: "Evolución del Renacimiento y precedente del Rococó",
    },
    StyleRecord {
        name: "Arquitectura Bauhaus",
        era: "1919-1933",
        features: "Funcionalismo, simplicidad, geometría pura, ausencia de ornamentación",
        materials: "Acero, hormigón, vidrio",
        lineage: "Influenció enormemente el Movimiento Moderno",
    },
    StyleRecord {
        name: "Arquitectura Beaux-Arts",
        era: "1880s-1920s",
        features: "Simetría, grandiosidad, ornamentación clásica elaborada",
        materials: "Piedra, mármol, hierro forjado",
        lineage: "Basado en los principios clásicos de la arquitectura grecorromana",
    },
    StyleRecord {
        name: "Arquitectura bizantina",
        era: "Siglos VI-XV",
        features: "Cúpulas sobre planta cuadrada, mosaicos, arcos de medio punto",
        materials: "Ladrillo, piedra, mosaicos y mármol",
        lineage: "Fusión de tradiciones romanas y orientales",
    },
    StyleRecord {
        name: "Arquitectura de la escuela de Chicago",
        era: "1880s-1900s",
        features: "Estructuras altas, ventanas grandes, énfasis en la verticalidad",
        materials: "Acero, vidrio, terracota",
        lineage: "Precursora del modernismo y los rascacielos",
    },
    StyleRecord {
        name: "Arquitectura colonial",
        era: "Siglos XVII-XIX",
        features: "Simetría, frontones triangulares, columnas clásicas",
        materials: "Madera, ladrillo, piedra local",
        lineage: "Adaptación de estilos europeos a las Américas",
    },
    StyleRecord {
        name: "Deconstructivismo",
        era: "1980s-presente",
        features: "Formas fragmentadas, ángulos inusuales, aparente caos controlado",
        materials: "Acero, vidrio, titanio, materiales compuestos",
        lineage: "Reacción contra el racionalismo del Movimiento Moderno",
    },
    StyleRecord {
        name: "Arquitectura eduardiana",
        era: "1901-1910",
        features: "Elegancia, ornamentación moderada, espacios luminosos",
        materials: "Ladrillo rojo, piedra, madera",
        lineage: "Evolución del estilo victoriano",
    },
    StyleRecord {
        name: "Arquitectura georgiana",
        era: "1714-1830",
        features: "Simetría, proporciones clásicas, elegancia sobria",
        materials: "Ladrillo, piedra, madera pintada",
        lineage: "Basada en el Palladianismo y el clasicismo",
    },
    StyleRecord {
        name: "Arquitectura gótica",
        era: "Siglos XII-XVI",
        features: "Arcos apuntados, bóvedas de crucería, vidrieras, verticalidad",
        materials: "Piedra, vidrio coloreado",
        lineage: "Evolución del románico",
    },
    StyleRecord {
        name: "Arquitectura neogriega",
        era: "1820s-1860s",
        features: "Columnas clásicas, frontones, proporciones armoniosas",
        materials: "Mármol, piedra, estuco",
        lineage: "Revivalismo de la arquitectura de la antigua Grecia",
    },
    StyleRecord {
        name: "Estilo internacional",
        era: "1920s-1960s",
        features: "Simplicidad, funcionalidad, ausencia de ornamentación",
        materials: "Acero, hormigón, vidrio",
        lineage: "Desarrollo del Movimiento Moderno",
    },
    StyleRecord {
        name: "Arquitectura novelty",
        era: "1920s-1950s",
        features: "Formas miméticas, diseños llamativos y temáticos",
        materials: "Variados, según el diseño específico",
        lineage: "Relacionada con la cultura pop y el comercio",
    },
    StyleRecord {
        name: "Arquitectura palladiana",
        era: "Siglo XVI-XVIII",
        features: "Simetría perfecta, proporciones matemáticas, pórticos con columnas",
        materials: "Piedra, ladrillo, estuco",
        lineage: "Basada en la arquitectura clásica romana",
    },
    StyleRecord {
        name: "Arquitectura posmoderna",
        era: "1960s-presente",
        features: "Eclecticismo, ironía, referencias históricas",
        materials: "Diversos, incluyendo materiales tradicionales y nuevos",
        lineage: "Reacción contra el Movimiento Moderno",
    },
    StyleRecord {
        name: "Arquitectura Queen Anne",
        era: "1880s-1900s",
        features: "Asimetría, torres, texturas variadas, ornamentación elaborada",
        materials: "Madera, ladrillo, piedra",
        lineage: "Parte del movimiento victoriano",
    },
    StyleRecord {
        name: "Arquitectura románica",
        era: "Siglos XI-XIII",
        features: "Arcos de medio punto, muros gruesos, bóvedas de cañón",
        materials: "Piedra, ladrillo",
        lineage: "Precedente del gótico",
    },
    StyleRecord {
        name: "Arquitectura neorrusa",
        era: "1850s-1900s",
        features: "Cúpulas bulbosas, decoración colorida, formas tradicionales rusas",
        materials: "Ladrillo, madera, azulejos decorativos",
        lineage: "Revivalismo de la arquitectura tradicional rusa",
    },
    StyleRecord {
        name: "Arquitectura neotudor",
        era: "Mediados del siglo XIX-presente",
        features: "Entramado de madera falso, tejados empinados, chimeneas ornamentadas",
        materials: "Ladrillo, estuco, madera",
        lineage: "Revivalismo del estilo Tudor original",
    },
];

/// Number of styles in the built-in catalog.
pub const BUILTIN_STYLE_COUNT: usize = STYLES.len();

/// Immutable, order-preserving style catalog.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    records: Vec<StyleRecord>,
    index_by_name: HashMap<&'static str, usize>,
}

impl StyleCatalog {
    /// The built-in catalog in training label order.
    pub fn builtin() -> Self {
        let records = STYLES.to_vec();
        let index_by_name = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.name, i))
            .collect();
        Self {
            records,
            index_by_name,
        }
    }

    /// Rebuild the decode order from an explicit list of labels.
    ///
    /// Every label must name a built-in style exactly once and every built-in
    /// style must appear. Anything else means the label order and the model
    /// cannot be trusted to agree.
    pub fn with_label_order<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let builtin = Self::builtin();
        let mut records = Vec::with_capacity(builtin.len());
        let mut index_by_name = HashMap::with_capacity(builtin.len());

        for (position, label) in labels.into_iter().enumerate() {
            let label = label.as_ref();
            let record = builtin.describe(label).ok_or_else(|| {
                ArchError::LabelIndex(format!("unknown style at position {position}: '{label}'"))
            })?;
            if index_by_name.insert(record.name, records.len()).is_some() {
                return Err(ArchError::LabelIndex(format!(
                    "duplicate style at position {position}: '{label}'"
                )));
            }
            records.push(*record);
        }

        if records.len() != builtin.len() {
            let missing: Vec<&str> = builtin
                .iter()
                .map(|r| r.name)
                .filter(|name| !index_by_name.contains_key(name))
                .collect();
            return Err(ArchError::LabelIndex(format!(
                "label order lists {} of {} styles; missing: {}",
                records.len(),
                builtin.len(),
                missing.join(", ")
            )));
        }

        Ok(Self {
            records,
            index_by_name,
        })
    }

    /// Load the decode order from a label index file.
    ///
    /// One style name per line. Blank lines and lines starting with `#` are
    /// ignored.
    pub fn load_label_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ArchError::LabelIndex(format!("failed to read {}: {}", path.display(), e))
        })?;

        let labels = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        let catalog = Self::with_label_order(labels)?;
        info!(
            path = %path.display(),
            styles = catalog.len(),
            "Loaded label index file"
        );
        Ok(catalog)
    }

    /// Number of styles (and therefore of classifier outputs).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Style decoded from classifier output index `index`.
    pub fn get(&self, index: usize) -> Option<&StyleRecord> {
        self.records.get(index)
    }

    /// Style metadata by name.
    pub fn describe(&self, name: &str) -> Option<&StyleRecord> {
        let index = self.index_of(name)?;
        debug!(style = name, index, "Catalog lookup");
        self.records.get(index)
    }

    /// Output index of a style, by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    /// Styles in decode order.
    pub fn iter(&self) -> std::slice::Iter<'_, StyleRecord> {
        self.records.iter()
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

//! 服装组合节点

use pyo3::{
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyResult, Python,
};

use super::OutfitSelection;
use crate::{
    core::{category::CATEGORY_KLEIN, types::NODE_STRING, PromptServer},
    vocab::{
        wardrobe::{
            WardrobeCategory, ACCESSORIES, BOTTOMS, LINGERIE_BOTTOMS, LINGERIE_TOPS, OUTERWEAR,
            SHOES, TOPS,
        },
        NONE,
    },
};

/// 下拉输入, 默认 none
fn wardrobe_input<'py>(
    py: Python<'py>,
    category: &WardrobeCategory,
) -> PyResult<(Vec<&'static str>, Bound<'py, PyDict>)> {
    let options = PyDict::new(py);
    options.set_item("default", NONE)?;
    Ok((category.options().to_vec(), options))
}

/// 服装组合
#[pyclass(subclass)]
pub struct KPPBOutfitComposer {}

impl PromptServer for KPPBOutfitComposer {}

#[pymethods]
impl KPPBOutfitComposer {
    #[new]
    fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .try_init();
        Self {}
    }

    #[classattr]
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types() -> (&'static str,) {
        (NODE_STRING,)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str,) {
        ("outfit",)
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_KLEIN;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Compose outfit descriptions from categorical selections."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
                required.set_item("top", wardrobe_input(py, &TOPS)?)?;
                required.set_item("bottom", wardrobe_input(py, &BOTTOMS)?)?;
                required.set_item("shoes", wardrobe_input(py, &SHOES)?)?;
                required
            })?;
            dict.set_item("optional", {
                let optional = PyDict::new(py);
                optional.set_item("lingerie_top", wardrobe_input(py, &LINGERIE_TOPS)?)?;
                optional.set_item("lingerie_bottom", wardrobe_input(py, &LINGERIE_BOTTOMS)?)?;
                optional.set_item("outerwear", wardrobe_input(py, &OUTERWEAR)?)?;
                optional.set_item("accessory_1", wardrobe_input(py, &ACCESSORIES)?)?;
                optional.set_item("accessory_2", wardrobe_input(py, &ACCESSORIES)?)?;
                optional.set_item("accessory_3", wardrobe_input(py, &ACCESSORIES)?)?;
                optional.set_item(
                    "extra_outfit_details",
                    (NODE_STRING, {
                        let extra = PyDict::new(py);
                        extra.set_item("multiline", true)?;
                        extra.set_item("default", "")?;
                        extra
                    }),
                )?;
                optional
            })?;

            Ok(dict.into())
        })
    }

    #[allow(clippy::too_many_arguments)]
    #[pyo3(
        name = "execute",
        signature = (
            top = NONE.to_string(),
            bottom = NONE.to_string(),
            shoes = NONE.to_string(),
            lingerie_top = NONE.to_string(),
            lingerie_bottom = NONE.to_string(),
            outerwear = NONE.to_string(),
            accessory_1 = NONE.to_string(),
            accessory_2 = NONE.to_string(),
            accessory_3 = NONE.to_string(),
            extra_outfit_details = String::new(),
        )
    )]
    fn execute(
        &mut self,
        top: String,
        bottom: String,
        shoes: String,
        lingerie_top: String,
        lingerie_bottom: String,
        outerwear: String,
        accessory_1: String,
        accessory_2: String,
        accessory_3: String,
        extra_outfit_details: String,
    ) -> PyResult<(String,)> {
        let selection = OutfitSelection {
            top,
            bottom,
            shoes,
            lingerie_top,
            lingerie_bottom,
            outerwear,
            accessories: [accessory_1, accessory_2, accessory_3],
            extra_outfit_details,
        };

        Ok((selection.compose(),))
    }
}

//! 节点注册

use pyo3::{PyResult, Python};

use crate::{
    config::PackConfig,
    core::node::NodeRegister,
    list::{
        KPPBActionList, KPPBCameraAngleList, KPPBExtendedActionList, KPPBExtendedGroupActionList,
        KPPBExtendedPoseList, KPPBGroupActionList, KPPBHairstyleList, KPPBIGEffectList,
        KPPBImageEditList, KPPBLightingList, KPPBOutfitList, KPPBPoseList, KPPBSceneList,
        KPPBShotTypeList,
    },
    prompt::{KPPBImageEditComposer, KPPBOutfitComposer, KPPBPromptBuilder},
    refiner::KPPBVLMRefiner,
};

pub fn node_register<'py>(py: Python<'py>, config: &PackConfig) -> PyResult<Vec<NodeRegister<'py>>> {
    let mut nodes: Vec<NodeRegister> = vec![
        // prompt
        NodeRegister(
            "KPPBPromptBuilder",
            py.get_type::<KPPBPromptBuilder>(),
            "Prompt Builder (kppb)",
        ),
        NodeRegister(
            "KPPBOutfitComposer",
            py.get_type::<KPPBOutfitComposer>(),
            "Outfit Composer (kppb)",
        ),
        NodeRegister(
            "KPPBImageEditComposer",
            py.get_type::<KPPBImageEditComposer>(),
            "Image Edit Composer (kppb)",
        ),
        // refiner
        NodeRegister(
            "KPPBVLMRefiner",
            py.get_type::<KPPBVLMRefiner>(),
            "VLM Prompt Refiner (kppb)",
        ),
        // list
        NodeRegister("KPPBSceneList", py.get_type::<KPPBSceneList>(), "Scene List (kppb)"),
        NodeRegister("KPPBPoseList", py.get_type::<KPPBPoseList>(), "Pose List (kppb)"),
        NodeRegister(
            "KPPBShotTypeList",
            py.get_type::<KPPBShotTypeList>(),
            "Shot Type List (kppb)",
        ),
        NodeRegister(
            "KPPBCameraAngleList",
            py.get_type::<KPPBCameraAngleList>(),
            "Camera Angle List (kppb)",
        ),
        NodeRegister(
            "KPPBLightingList",
            py.get_type::<KPPBLightingList>(),
            "Lighting List (kppb)",
        ),
        NodeRegister("KPPBOutfitList", py.get_type::<KPPBOutfitList>(), "Outfit List (kppb)"),
        NodeRegister(
            "KPPBImageEditList",
            py.get_type::<KPPBImageEditList>(),
            "Image Edit List (kppb)",
        ),
        NodeRegister(
            "KPPBIGEffectList",
            py.get_type::<KPPBIGEffectList>(),
            "IG Effect List (kppb)",
        ),
        NodeRegister(
            "KPPBHairstyleList",
            py.get_type::<KPPBHairstyleList>(),
            "Hairstyle List (kppb)",
        ),
        NodeRegister("KPPBActionList", py.get_type::<KPPBActionList>(), "Action List (kppb)"),
        NodeRegister(
            "KPPBGroupActionList",
            py.get_type::<KPPBGroupActionList>(),
            "Group Action List (kppb)",
        ),
    ];

    // 扩展词表
    if config.extended_vocabulary {
        nodes.extend([
            NodeRegister(
                "KPPBExtendedPoseList",
                py.get_type::<KPPBExtendedPoseList>(),
                "Extended Pose List (kppb)",
            ),
            NodeRegister(
                "KPPBExtendedActionList",
                py.get_type::<KPPBExtendedActionList>(),
                "Extended Action List (kppb)",
            ),
            NodeRegister(
                "KPPBExtendedGroupActionList",
                py.get_type::<KPPBExtendedGroupActionList>(),
                "Extended Group Action List (kppb)",
            ),
        ]);
    }

    Ok(nodes)
}

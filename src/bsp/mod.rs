mod container;
mod entities;
mod lumps;
mod options;
mod repr;

pub use container::{BspFile, Lump};

pub use entities::{Entities, Entity};

pub use lumps::{Model, Payload, Plane, Record, MODEL_SIZE, PLANE_SIZE};

pub use options::BspOptions;

pub use repr::{
    Entry, Head, LumpKind, Variant, BSP2_VERSION, BSP_VERSION, ENTRY_COUNT,
    GOLDSRC_VERSION, HEAD_SIZE,
};



#[cfg(test)]
mod lumps_test;

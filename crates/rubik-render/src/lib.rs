//! Render-side data for the cube: cameras, per-cubie draw instances and
//! the picking colour codec. GPU submission lives outside this crate.

pub mod camera;
pub mod camera_rig;
pub mod draw_list;
pub mod free_fly_camera;
pub mod orbit_camera;
pub mod picking;

pub use camera::{Camera, CameraUniform, Projection};
pub use camera_rig::{CameraMode, CameraRig};
pub use draw_list::{
    CubieInstance, DrawList, InstanceRaw, PickInstance, build_draw_list, build_picking_list,
};
pub use free_fly_camera::{FlyInput, FreeFlyCamera};
pub use orbit_camera::OrbitCamera;
pub use picking::{CpuPickBuffer, MAX_PICKABLE_ID, PickSource, color_to_id, id_to_color, pick};

mod autonomous;
mod catapult_property;
mod lifecycle;
mod rig;
mod teleop;

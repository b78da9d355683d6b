fn main() {
    println!("cargo:rerun-if-changed=door_config.json");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}

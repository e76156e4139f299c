fn main() {
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .emit_rerun_if_changed(false)
        .compile_protos(&["proto/user.proto"], &["proto"])
        .unwrap_or_else(|e| panic!("failed to compile protos: {e}"));
    println!("cargo:rerun-if-changed=proto/user.proto");
}

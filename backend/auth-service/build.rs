fn main() {
    println!("cargo:rerun-if-changed=../proto/services/auth_service.proto");

    // auth-service PROVIDES AuthService (server implementation)
    // Client code is used by auth-cli and the end-to-end tests
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &["../proto/services/auth_service.proto"],
            &["../proto/services"],
        )
        .expect("Failed to compile auth_service.proto for auth-service");
}

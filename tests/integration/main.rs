//! Integration tests for vpcflow-stream.
//!
//! The pipeline tests run against the in-memory bucket store. The S3 tests
//! require LocalStack and are marked as `#[ignore]` by default to avoid
//! running them in CI without proper setup.
//!
//! ## Running the LocalStack Tests
//!
//! 1. Start LocalStack:
//!    ```bash
//!    docker run --rm -d -p 4566:4566 localstack/localstack
//!    ```
//!
//! 2. Run the integration tests:
//!    ```bash
//!    LOCALSTACK_ENDPOINT=http://localhost:4566 cargo test -p integration-tests -- --ignored
//!    ```

mod common;
mod pipeline_test;
mod s3_test;

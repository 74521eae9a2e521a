//! End-to-end tests: Java and Kotlin sources on disk -> definition index -> resolver.

use std::path::Path;

use grpcnav::{CallSite, CandidateOrder, NotFound, Resolution, Resolver, ResolverConfig, SearchScope, Tier};

use crate::definitions::{build_definition_index, find_call_site, DefIndexArgs, DefinitionIndex};

fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
}

fn index_of(root: &Path) -> DefinitionIndex {
    build_definition_index(&DefIndexArgs {
        dir: root.to_string_lossy().to_string(),
        ext: "java".to_string(),
        no_ignore: false,
    })
    .unwrap()
}

fn lexicographic() -> ResolverConfig {
    ResolverConfig { order: CandidateOrder::Lexicographic, ..ResolverConfig::default() }
}

fn order_project() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    write_files(tmp.path(), &[
        ("shop/OrderGrpcService.java", r#"
package shop;

public class OrderGrpcService {
    public void place(PlaceRequest request, StreamObserver<PlaceReply> observer) {}
}
"#),
        ("shop/gen/OrderServiceGrpc.java", r#"
package shop.gen;

public final class OrderServiceGrpc {
    public static abstract class OrderServiceImplBase {
        public void place(PlaceRequest request, StreamObserver<PlaceReply> observer) {}
        public void cancel(CancelRequest request, StreamObserver<CancelReply> observer) {}
    }
}
"#),
        ("web/CheckoutController.java", r#"
package web;

public class CheckoutController {
    private final OrderServiceGrpc.OrderServiceBlockingStub orderStub;
    private final PaymentClient payments;

    public void checkout(Cart cart) {
        orderStub.place(toRequest(cart));
        orderStub.cancel(toCancel(cart));
        orderStub.refund(toRefund(cart));
        payments.charge(cart.total());
    }
}
"#),
    ]);
    tmp
}

// ─── Priority scenarios ─────────────────────────────────────

#[test]
fn test_cancel_falls_through_to_impl_base() {
    let tmp = order_project();
    let index = index_of(tmp.path());
    let m = grpcnav::resolve(&index, "OrderStub", "cancel").unwrap();
    assert_eq!(m.class.qualified_name, "shop.gen.OrderServiceGrpc.OrderServiceImplBase");
    assert_eq!(m.method.name, "cancel");
    assert_eq!(m.tier, Tier::ImplBase);
    let loc = m.method.location.unwrap();
    assert!(loc.file.ends_with("OrderServiceGrpc.java"));
    assert_eq!(loc.line, 7);
}

#[test]
fn test_place_prefers_grpc_service() {
    let tmp = order_project();
    let index = index_of(tmp.path());
    let m = grpcnav::resolve(&index, "orderStub", "place").unwrap();
    assert_eq!(m.class.qualified_name, "shop.OrderGrpcService");
    assert_eq!(m.tier, Tier::GrpcService);
}

#[test]
fn test_unknown_method_reports_first_qualifying_class() {
    let tmp = order_project();
    let index = index_of(tmp.path());
    let resolution = Resolver::new(&index, lexicographic()).resolve(&CallSite::new("orderStub", "refund"));
    let Resolution::NotFound(reason) = resolution else { panic!("expected not found") };
    assert_eq!(reason.message(), "Method refund not found in implementation OrderGrpcService");
}

#[test]
fn test_unrelated_receiver_finds_nothing() {
    let tmp = order_project();
    let index = index_of(tmp.path());
    assert!(grpcnav::resolve(&index, "inventoryStub", "place").is_none());
    let resolution = Resolver::new(&index, lexicographic()).resolve(&CallSite::new("inventoryStub", "place"));
    assert_eq!(
        resolution,
        Resolution::NotFound(NotFound::NoImplementation {
            receiver: "inventoryStub".to_string(),
            method: "place".to_string(),
            candidates: 0,
        })
    );
}

#[test]
fn test_resolution_is_repeatable_and_case_insensitive() {
    let tmp = order_project();
    let index = index_of(tmp.path());
    let first = grpcnav::resolve(&index, "OrderStub", "cancel");
    let second = grpcnav::resolve(&index, "OrderStub", "cancel");
    let lower = grpcnav::resolve(&index, "orderstub", "cancel");
    assert_eq!(first, second);
    assert_eq!(first, lower);
}

#[test]
fn test_scope_limits_candidates() {
    let tmp = order_project();
    let index = index_of(tmp.path());
    let gen_dir = std::fs::canonicalize(tmp.path().join("shop/gen")).unwrap();
    let config = ResolverConfig {
        scope: SearchScope::from_paths(vec![grpcnav::clean_path(&gen_dir.to_string_lossy())]),
        ..lexicographic()
    };
    let m = Resolver::new(&index, config)
        .resolve(&CallSite::new("orderStub", "place"))
        .into_match()
        .unwrap();
    assert_eq!(m.tier, Tier::ImplBase);
}

// ─── Cursor to implementation ───────────────────────────────

fn goto(tmp: &Path, line: u32, col: u32) -> Option<Resolution> {
    let index = index_of(tmp);
    let call = find_call_site(&tmp.join("web/CheckoutController.java"), line, col).unwrap()?;
    Some(Resolver::new(&index, lexicographic()).resolve(&call))
}

#[test]
fn test_goto_from_cursor_on_method() {
    let tmp = order_project();
    // line 10: `        orderStub.cancel(toCancel(cart));`
    let resolution = goto(tmp.path(), 10, 20).unwrap();
    let m = resolution.into_match().unwrap();
    assert_eq!(m.class.name, "OrderServiceImplBase");
    assert_eq!(m.method.name, "cancel");
}

#[test]
fn test_goto_from_cursor_on_receiver() {
    let tmp = order_project();
    // line 9: `        orderStub.place(toRequest(cart));`
    let m = goto(tmp.path(), 9, 10).unwrap().into_match().unwrap();
    assert_eq!(m.class.name, "OrderGrpcService");
}

#[test]
fn test_goto_non_stub_receiver_is_refused() {
    let tmp = order_project();
    // line 12: `        payments.charge(cart.total());`
    let resolution = goto(tmp.path(), 12, 20).unwrap();
    assert!(matches!(resolution, Resolution::NotFound(NotFound::MissingStubSuffix { .. })));
}

#[test]
fn test_goto_outside_call_is_none() {
    let tmp = order_project();
    // line 4: class header
    assert!(goto(tmp.path(), 4, 10).is_none());
}

// ─── Kotlin ─────────────────────────────────────────────────

fn kotlin_project() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    write_files(tmp.path(), &[
        ("gen/UserServiceGrpcKt.kt", r#"package com.acme.user

object UserServiceGrpcKt {
    abstract class UserServiceCoroutineImplBase : AbstractCoroutineServerImpl() {
        open suspend fun getUser(request: GetUserRequest): User = throw unimplemented()
        open suspend fun deleteUser(request: DeleteUserRequest): Empty = throw unimplemented()
    }
}
"#),
        ("server/UserServiceGrpcService.kt", r#"package com.acme.user.server

class UserServiceGrpcService : UserServiceGrpcKt.UserServiceCoroutineImplBase() {
    override suspend fun getUser(request: GetUserRequest): User = lookup(request)
}
"#),
        ("web/ProfileController.kt", r#"package com.acme.web

class ProfileController(private val userServiceStub: UserServiceCoroutineStub) {
    suspend fun show(id: Long) {
        userServiceStub.getUser(request(id))
        userServiceStub.deleteUser(request(id))
    }
}
"#),
    ]);
    tmp
}

fn kotlin_goto(tmp: &Path, line: u32, col: u32) -> Option<Resolution> {
    let index = build_definition_index(&DefIndexArgs {
        dir: tmp.to_string_lossy().to_string(),
        ext: "kt".to_string(),
        no_ignore: false,
    })
    .unwrap();
    let call = find_call_site(&tmp.join("web/ProfileController.kt"), line, col).unwrap()?;
    Some(Resolver::new(&index, lexicographic()).resolve(&call))
}

#[test]
fn test_kotlin_goto_prefers_grpc_service() {
    let tmp = kotlin_project();
    // line 5: `        userServiceStub.getUser(request(id))`
    let m = kotlin_goto(tmp.path(), 5, 27).unwrap().into_match().unwrap();
    assert_eq!(m.class.qualified_name, "com.acme.user.server.UserServiceGrpcService");
    assert_eq!(m.tier, Tier::GrpcService);
    assert!(m.method.location.unwrap().file.ends_with("UserServiceGrpcService.kt"));
}

#[test]
fn test_kotlin_goto_inherited_method_stays_on_grpc_service() {
    let tmp = kotlin_project();
    // line 6: `        userServiceStub.deleteUser(request(id))`
    let m = kotlin_goto(tmp.path(), 6, 27).unwrap().into_match().unwrap();
    assert_eq!(m.class.name, "UserServiceGrpcService");
    assert_eq!(m.method.name, "deleteUser");
    let loc = m.method.location.unwrap();
    assert!(loc.file.ends_with("UserServiceGrpcKt.kt"));
    assert_eq!(loc.line, 6);
}

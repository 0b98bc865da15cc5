//! `#[derive(Reflect)]` for records.
//!
//! Field attributes:
//! - `#[jinjaval(name = "key")]` maps the field to `key`.
//! - `#[jinjaval(skip)]` or `#[jinjaval(name = "-")]` excludes the field.
//!
//! Container attributes `#[jinjaval(unmarshal_text)]`, `#[jinjaval(unmarshal_binary)]`
//! and `#[jinjaval(marshal_text)]` route the matching hook to the type's own
//! `UnmarshalText`, `UnmarshalBinary` or `MarshalText` impl.
//!
//! Only fields declared `pub` (any visibility but private) and not excluded
//! take part in encode and decode; other fields need not implement `Reflect`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, GenericParam, LitStr, Visibility, parse_macro_input, parse_quote};

const EXCLUDE_TAG: &str = "-";

/// Derive `jinjaval::marshal::Reflect` for a struct with named fields or a unit struct.
#[proc_macro_derive(Reflect, attributes(jinjaval))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	expand(input).unwrap_or_else(syn::Error::into_compile_error).into()
}

#[derive(Default)]
struct ContainerOpts {
	unmarshal_text: bool,
	unmarshal_binary: bool,
	marshal_text: bool,
}

#[derive(Default)]
struct FieldOpts {
	name: Option<String>,
	skip: bool,
}

struct FieldSpec {
	ident: syn::Ident,
	tag: Option<String>,
	visible: bool,
}

impl FieldSpec {
	fn is_active(&self) -> bool {
		self.visible && self.tag.as_deref() != Some(EXCLUDE_TAG)
	}
}

fn expand(mut input: DeriveInput) -> syn::Result<TokenStream2> {
	let opts = container_opts(&input.attrs)?;
	let fields = record_fields(&input)?;

	if let Some(lifetime) = input.generics.lifetimes().next() {
		return Err(syn::Error::new_spanned(lifetime, "Reflect cannot be derived for types with lifetime parameters"));
	}
	for param in &mut input.generics.params {
		if let GenericParam::Type(param) = param {
			param.bounds.push(parse_quote!(::jinjaval::marshal::Reflect));
			param.bounds.push(parse_quote!('static));
		}
	}

	let name = &input.ident;
	let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

	let metas = fields.iter().map(|field| {
		let ident = field.ident.to_string();
		let tag = match &field.tag {
			Some(tag) => quote!(::core::option::Option::Some(#tag)),
			None => quote!(::core::option::Option::None),
		};
		let visible = field.visible;
		quote! {
			::jinjaval::marshal::FieldMeta {
				ident: #ident,
				tag: #tag,
				visible: #visible,
			}
		}
	});

	let active: Vec<_> = fields.iter().filter(|field| field.is_active()).map(|field| &field.ident).collect();
	let count = active.len();

	let text_hook = opts.unmarshal_text.then(|| {
		quote! {
			fn text_hook(&mut self) -> ::core::option::Option<&mut dyn ::jinjaval::marshal::UnmarshalText> {
				::core::option::Option::Some(self)
			}
		}
	});
	let binary_hook = opts.unmarshal_binary.then(|| {
		quote! {
			fn binary_hook(&mut self) -> ::core::option::Option<&mut dyn ::jinjaval::marshal::UnmarshalBinary> {
				::core::option::Option::Some(self)
			}
		}
	});
	let marshal_hook = opts.marshal_text.then(|| {
		quote! {
			fn marshal_hook(&self) -> ::core::option::Option<&dyn ::jinjaval::marshal::MarshalText> {
				::core::option::Option::Some(self)
			}
		}
	});

	Ok(quote! {
		impl #impl_generics ::jinjaval::marshal::Reflect for #name #ty_generics #where_clause {
			fn describe() -> ::jinjaval::marshal::TypeDesc {
				let table = ::jinjaval::marshal::FieldTable::of::<Self>(|| ::std::vec![#(#metas),*]);
				::jinjaval::marshal::TypeDesc::of::<Self>(::jinjaval::marshal::Shape::Record(table))
			}

			fn type_desc(&self) -> ::jinjaval::marshal::TypeDesc {
				<Self as ::jinjaval::marshal::Reflect>::describe()
			}

			fn reflect(&self) -> ::jinjaval::marshal::HostRef<'_> {
				let fields: [&dyn ::jinjaval::marshal::Reflect; #count] = [#(&self.#active),*];
				::jinjaval::marshal::HostRef::Record(::std::boxed::Box::new(fields.into_iter()))
			}

			fn reflect_mut(&mut self) -> ::jinjaval::marshal::HostMut<'_> {
				let fields: [&mut dyn ::jinjaval::marshal::Reflect; #count] = [#(&mut self.#active),*];
				::jinjaval::marshal::HostMut::Record(::std::boxed::Box::new(fields.into_iter()))
			}

			#text_hook
			#binary_hook
			#marshal_hook
		}
	})
}

fn record_fields(input: &DeriveInput) -> syn::Result<Vec<FieldSpec>> {
	let Data::Struct(data) = &input.data else {
		return Err(syn::Error::new_spanned(&input.ident, "Reflect can only be derived for structs"));
	};

	let named = match &data.fields {
		Fields::Named(named) => named,
		Fields::Unit => return Ok(Vec::new()),
		Fields::Unnamed(unnamed) => {
			return Err(syn::Error::new_spanned(unnamed, "Reflect requires named fields"));
		}
	};

	named
		.named
		.iter()
		.map(|field| {
			let opts = field_opts(&field.attrs)?;
			let tag = if opts.skip { Some(EXCLUDE_TAG.to_owned()) } else { opts.name };
			Ok(FieldSpec {
				ident: field.ident.clone().ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?,
				tag,
				visible: !matches!(field.vis, Visibility::Inherited),
			})
		})
		.collect()
}

fn container_opts(attrs: &[Attribute]) -> syn::Result<ContainerOpts> {
	let mut opts = ContainerOpts::default();
	for attr in attrs.iter().filter(|attr| attr.path().is_ident("jinjaval")) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("unmarshal_text") {
				opts.unmarshal_text = true;
			} else if meta.path.is_ident("unmarshal_binary") {
				opts.unmarshal_binary = true;
			} else if meta.path.is_ident("marshal_text") {
				opts.marshal_text = true;
			} else {
				return Err(meta.error("unknown jinjaval container attribute"));
			}
			Ok(())
		})?;
	}
	Ok(opts)
}

fn field_opts(attrs: &[Attribute]) -> syn::Result<FieldOpts> {
	let mut opts = FieldOpts::default();
	for attr in attrs.iter().filter(|attr| attr.path().is_ident("jinjaval")) {
		attr.parse_nested_meta(|meta| {
			if meta.path.is_ident("name") {
				let name: LitStr = meta.value()?.parse()?;
				opts.name = Some(name.value());
			} else if meta.path.is_ident("skip") {
				opts.skip = true;
			} else {
				return Err(meta.error("unknown jinjaval field attribute"));
			}
			Ok(())
		})?;
	}
	Ok(opts)
}
